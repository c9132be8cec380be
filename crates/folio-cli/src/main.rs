//! 알트코인 포트폴리오 트래커 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 정적 평가 테이블 (수익률 분포 포함)
//! folio valuation
//!
//! # 30일 수익률 분석 (균등 가중)
//! folio analyze
//!
//! # 60일 수익률 분석 + 헤지, 수동 가중치
//! folio analyze --days 60 --hedge --weights SQD=30 --weights GRASS=10
//!
//! # 보유 토큰의 Gate.io 상장 여부 확인
//! folio markets
//! ```

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;
mod render;

use folio_core::{init_logging, AppConfig};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Altcoin portfolio tracker - Gate.io 기반 수익률 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 보유 자산의 정적 평가 테이블 출력
    Valuation,

    /// 수익률 분석 실행 (조회 → 정규화 → 가중 집계 → 헤지)
    Analyze {
        /// 조회 기간 (일). 미지정 시 설정 파일 값 사용
        #[arg(short, long)]
        days: Option<u32>,

        /// 헤지 바스켓 성과 차감 적용
        #[arg(long)]
        hedge: bool,

        /// 균등 가중 강제 (설정 파일의 weight_mode 무시)
        #[arg(long)]
        equal: bool,

        /// 수동 원시 가중치 오버라이드 (예: --weights SQD=30)
        #[arg(short, long, value_name = "TOKEN=RAW")]
        weights: Vec<String>,

        /// 수동 가중치를 기본값(토큰당 10)으로 초기화
        #[arg(long)]
        reset_weights: bool,
    },

    /// 보유 토큰의 거래소 상장 여부 확인
    Markets,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .map_err(|e| format!("설정 로드 실패 ({}): {}", cli.config, e))?;

    init_logging(&config.logging)?;

    let result = match cli.command {
        Commands::Valuation => commands::valuation::run(&config),
        Commands::Analyze {
            days,
            hedge,
            equal,
            weights,
            reset_weights,
        } => {
            commands::analyze::run(
                &config,
                commands::analyze::AnalyzeArgs {
                    days,
                    hedge,
                    equal,
                    weights,
                    reset_weights,
                },
            )
            .await
        }
        Commands::Markets => commands::markets::run(&config).await,
    };

    if let Err(e) = result {
        error!("명령 실행 실패: {}", e);
        return Err(e.into());
    }

    Ok(())
}
