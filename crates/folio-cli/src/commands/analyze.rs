//! 수익률 분석 명령.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::str::FromStr;

use folio_analytics::{run_analysis, AnalysisOptions, AnalysisReport, HedgeStatus};
use folio_core::{AppConfig, WeightMode, WeightSession};
use folio_exchange::{GateioClient, GateioConfig};

use crate::render::{fmt_dec, fmt_money, fmt_pct_cell};

/// analyze 서브커맨드 인자.
pub struct AnalyzeArgs {
    /// 조회 기간 (일)
    pub days: Option<u32>,
    /// 헤지 적용
    pub hedge: bool,
    /// 균등 가중 강제
    pub equal: bool,
    /// "TOKEN=RAW" 형식의 수동 가중치 오버라이드
    pub weights: Vec<String>,
    /// 수동 가중치를 기본값으로 초기화
    pub reset_weights: bool,
}

/// "TOKEN=RAW" 인자를 파싱합니다.
fn parse_weight_arg(arg: &str) -> Result<(String, Decimal)> {
    let (token, raw) = arg
        .split_once('=')
        .with_context(|| format!("잘못된 가중치 형식: {} (예: SQD=30)", arg))?;

    let value = Decimal::from_str(raw.trim())
        .with_context(|| format!("잘못된 가중치 값: {}", raw))?;

    Ok((token.trim().to_uppercase(), value))
}

/// 수익률 분석을 실행하고 결과 테이블을 출력합니다.
pub async fn run(config: &AppConfig, args: AnalyzeArgs) -> Result<()> {
    let holdings = config.holdings()?;
    if holdings.is_empty() {
        anyhow::bail!("설정된 보유 자산이 없습니다");
    }

    let tokens: Vec<String> = holdings.iter().map(|h| h.token.clone()).collect();

    // 세션 가중치 상태: 기본값 → 설정 파일 → CLI 오버라이드 순으로 적용
    let mut session = WeightSession::new(&tokens);
    if !args.reset_weights {
        for (token, raw) in &config.analysis.manual_weights {
            session.set(&token.to_uppercase(), *raw);
        }
    }
    for arg in &args.weights {
        let (token, raw) = parse_weight_arg(arg)?;
        session.set(&token, raw);
    }

    let mode = if args.equal {
        WeightMode::Equal
    } else if !args.weights.is_empty() {
        WeightMode::Manual
    } else {
        config.analysis.weight_mode
    };
    let weights = session.resolve(mode)?;

    let lookback_days = args.days.unwrap_or(config.analysis.lookback_days);
    let use_hedge = args.hedge || config.analysis.hedge;

    let mut options = AnalysisOptions::new(lookback_days, weights);
    if use_hedge {
        options = options.with_hedge(config.hedge_symbols()?);
    }

    let client = GateioClient::new(GateioConfig::from(&config.exchange))?;

    println!(
        "\n🚀 {}일 수익률 분석 시작 (가중치: {}, 헤지: {})",
        lookback_days,
        match mode {
            WeightMode::Equal => "균등",
            WeightMode::Manual => "수동",
        },
        if use_hedge { "적용" } else { "미적용" }
    );

    let pb = ProgressBar::new(options.total_steps(holdings.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let pb_ref = pb.clone();
    let report = run_analysis(&client, &holdings, &options, move |current, _, name| {
        pb_ref.set_position(current as u64);
        pb_ref.set_message(name.to_string());
    })
    .await?;

    pb.finish_and_clear();

    print_report(&report, use_hedge);
    Ok(())
}

/// 분석 리포트를 콘솔 테이블로 출력합니다.
fn print_report(report: &AnalysisReport, use_hedge: bool) {
    // 제외된 토큰 경고
    for skipped in &report.skipped {
        println!("⚠️  {} ({}) 제외: {}", skipped.token, skipped.symbol, skipped.reason);
    }

    // 시간 인덱스 수익률 테이블
    println!("\n📊 기간별 수익률 (%)");
    print!("{:<12}", "Date");
    for column in &report.returns.columns {
        print!(" {:>10}", truncate(&column.name, 10));
    }
    println!();

    for (idx, timestamp) in report.returns.timestamps.iter().enumerate() {
        print!("{:<12}", timestamp.format("%Y-%m-%d").to_string());
        for column in &report.returns.columns {
            print!(" {}", fmt_pct_cell(column.values[idx]));
        }
        println!();
    }

    // 최근 수익률 스냅샷
    println!("\n📋 최근 수익률 스냅샷");
    for row in &report.snapshot {
        println!("{:<20} {:>10}%", row.name, fmt_dec(row.latest_pct, 2));
    }

    // 가중 평가액
    println!("\n💰 가중 포트폴리오 평가액 (USDT)");
    println!("{:<10} {:>16} {:>10}", "Token", "Value (USDT)", "Weight %");
    for row in &report.weighted {
        println!(
            "{:<10} {:>16} {:>10}",
            row.token,
            fmt_money(row.value),
            fmt_dec(row.weight_pct, 2)
        );
    }
    println!("{}", "-".repeat(38));
    println!("{:<10} {:>16}", "TOTAL", fmt_money(report.total_value));

    // 헤지 상태
    if use_hedge || report.hedge_status != HedgeStatus::Disabled {
        println!("\n🛡️  {}", report.hedge_status.description());
    }
}

/// 컬럼 이름을 최대 길이로 자릅니다.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_weight_arg() {
        let (token, raw) = parse_weight_arg("sqd=30").unwrap();
        assert_eq!(token, "SQD");
        assert_eq!(raw, dec!(30));

        let (token, raw) = parse_weight_arg("GRASS = 12.5").unwrap();
        assert_eq!(token, "GRASS");
        assert_eq!(raw, dec!(12.5));

        assert!(parse_weight_arg("SQD").is_err());
        assert!(parse_weight_arg("SQD=abc").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Portfolio (Hedged)", 10), "Portfolio ");
        assert_eq!(truncate("SQD", 10), "SQD");
    }
}
