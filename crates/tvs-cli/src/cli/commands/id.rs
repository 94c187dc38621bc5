//! `tvs id <url>` – print the post id.

use anyhow::Result;
use tvs_core::post_id::extract_post_id;

pub fn run_id(url: &str) -> Result<()> {
    println!("{}", extract_post_id(url)?);
    Ok(())
}
