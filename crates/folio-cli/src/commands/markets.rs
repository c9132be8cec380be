//! 상장 여부 확인 명령.

use anyhow::Result;

use folio_core::AppConfig;
use folio_exchange::{GateioClient, GateioConfig, MarketDataSource};

/// 보유 토큰과 헤지 바스켓의 거래소 상장 여부를 출력합니다.
pub async fn run(config: &AppConfig) -> Result<()> {
    let holdings = config.holdings()?;
    if holdings.is_empty() {
        anyhow::bail!("설정된 보유 자산이 없습니다");
    }

    let client = GateioClient::new(GateioConfig::from(&config.exchange))?;

    println!("\n🔍 Gate.io 상장 여부 확인 중...");
    let markets = client.load_markets().await?;
    println!("거래 가능 거래쌍: {}개\n", markets.len());

    for holding in &holdings {
        let pair = holding.symbol.to_pair_id();
        if markets.contains(&pair) {
            println!("✅ {} → {}", holding.token, holding.symbol);
        } else {
            println!("❌ {} → {} (미상장)", holding.token, holding.symbol);
        }
    }

    println!();
    for symbol in config.hedge_symbols()? {
        let pair = symbol.to_pair_id();
        if markets.contains(&pair) {
            println!("✅ 헤지 {}", symbol);
        } else {
            println!("❌ 헤지 {} (미상장)", symbol);
        }
    }

    Ok(())
}
