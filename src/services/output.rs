//! Text/JSON output helpers. Every command prints either human lines or
//! a `JsonOut` envelope, never a mix.

use crate::domain::models::JsonOut;
use serde::Serialize;

pub fn print_one<T: Serialize>(
    json: bool,
    data: &T,
    text: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", text(data));
    }
    Ok(())
}
