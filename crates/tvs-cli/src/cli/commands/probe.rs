//! `tvs probe <url>...` – size probe only.

use anyhow::Result;
use tvs_core::config::TvsConfig;
use tvs_core::Scraper;

pub fn run_probe(cfg: &TvsConfig, urls: &[String], parallel: bool, json: bool) -> Result<()> {
    let mut cfg = cfg.clone();
    cfg.probe.parallel |= parallel;
    let report = Scraper::new(&cfg)?.probe_sizes(urls);

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        for (url, size) in urls.iter().zip(&report.sizes) {
            println!("{:<10} {}", size.to_string(), url);
        }
    }
    Ok(())
}
