// The backend serialises decimals either as JSON numbers or as strings ("12.50").

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

fn parse(raw: RawAmount) -> Option<f64> {
    match raw {
        RawAmount::Number(n) => Some(n),
        RawAmount::Text(s) => s.trim().parse().ok(),
    }
}

pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(raw.and_then(parse).unwrap_or(0.0))
}

pub fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(raw.and_then(parse))
}
