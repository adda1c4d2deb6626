use serde::{Deserialize, Deserializer};

/// One row of the broker's instrument master dump.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Instrument {
    pub instrument_token: u32,
    pub exchange_token: u32,
    pub tradingsymbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_zero")]
    pub last_price: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub expiry: Option<String>,
    #[serde(default, deserialize_with = "empty_as_zero")]
    pub strike: f64,
    #[serde(default, deserialize_with = "empty_as_zero")]
    pub tick_size: f64,
    #[serde(default, deserialize_with = "empty_as_zero")]
    pub lot_size: f64,
    pub instrument_type: String,
    pub segment: String,
    pub exchange: String,
}

fn empty_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    Ok((!s.is_empty()).then(|| s.to_string()))
}

/// Parse the CSV instrument dump (`GET /instruments`).
pub fn parse_instruments_csv(body: &str) -> Result<Vec<Instrument>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    reader.deserialize().collect()
}

/// First instrument whose trading symbol matches, optionally restricted to one exchange.
pub fn find_by_symbol<'a>(
    instruments: &'a [Instrument],
    symbol: &str,
    exchange: Option<&str>,
) -> Option<&'a Instrument> {
    instruments.iter().find(|i| {
        i.tradingsymbol == symbol && exchange.map_or(true, |ex| i.exchange == ex)
    })
}
