//! 정적 평가 테이블 명령.

use anyhow::Result;

use folio_core::{compute_total, compute_valuation, AppConfig, ReturnDistribution};

use crate::render::{fmt_dec, fmt_money};

/// 보유 자산 평가 테이블과 수익률 분포를 출력합니다.
pub fn run(config: &AppConfig) -> Result<()> {
    let holdings = config.holdings()?;
    if holdings.is_empty() {
        anyhow::bail!("설정된 보유 자산이 없습니다");
    }

    let rows = compute_valuation(&holdings);
    let total = compute_total(&rows);
    let distribution = ReturnDistribution::from_rows(&rows);

    println!("\n📋 보유 자산 평가");
    println!(
        "{:<10} {:>14} {:>14} {:>14} {:>14} {:>10}",
        "Token", "Quantity", "Cost Basis", "Value", "$ Return", "% Return"
    );

    for row in rows.iter().chain(std::iter::once(&total)) {
        if row.token == "TOTAL" {
            println!("{}", "-".repeat(80));
        }
        println!(
            "{:<10} {:>14} {:>14} {:>14} {:>14} {:>10}",
            row.token,
            fmt_dec(row.quantity, 0),
            fmt_money(row.cost_basis),
            fmt_money(row.current_value),
            fmt_money(row.dollar_return),
            fmt_dec(row.percent_return, 2),
        );
    }

    println!("\n📊 수익률 평균: {}%", fmt_dec(distribution.mean_pct, 2));
    println!("📈 수익률 표준편차: {}%", fmt_dec(distribution.std_dev_pct, 2));

    Ok(())
}
