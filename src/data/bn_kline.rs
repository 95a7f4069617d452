use {
    anyhow::{Result, bail},
    binance_sdk::{
        config::ConfigurationRestApi,
        errors::ConnectorError,
        spot::{
            SpotRestApi,
            rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
        },
    },
    std::{collections::HashSet, convert::TryFrom, error::Error, fmt},
};

use crate::{
    config::{BINANCE, BinanceApiConfig},
    data::GlobalRateLimiter,
    domain::{Candle, PairInterval},
    utils::TimeUtils,
};

pub fn try_interval_from_ms(ms: i64) -> Result<KlinesIntervalEnum, String> {
    use TimeUtils as T;
    match ms {
        T::MS_IN_S => Ok(KlinesIntervalEnum::Interval1s),
        T::MS_IN_MIN => Ok(KlinesIntervalEnum::Interval1m),
        T::MS_IN_3_MIN => Ok(KlinesIntervalEnum::Interval3m),
        T::MS_IN_5_MIN => Ok(KlinesIntervalEnum::Interval5m),
        T::MS_IN_15_MIN => Ok(KlinesIntervalEnum::Interval15m),
        T::MS_IN_30_MIN => Ok(KlinesIntervalEnum::Interval30m),
        T::MS_IN_H => Ok(KlinesIntervalEnum::Interval1h),
        T::MS_IN_2_H => Ok(KlinesIntervalEnum::Interval2h),
        T::MS_IN_4_H => Ok(KlinesIntervalEnum::Interval4h),
        T::MS_IN_6_H => Ok(KlinesIntervalEnum::Interval6h),
        T::MS_IN_8_H => Ok(KlinesIntervalEnum::Interval8h),
        T::MS_IN_12_H => Ok(KlinesIntervalEnum::Interval12h),
        T::MS_IN_D => Ok(KlinesIntervalEnum::Interval1d),
        T::MS_IN_3_D => Ok(KlinesIntervalEnum::Interval3d),
        T::MS_IN_W => Ok(KlinesIntervalEnum::Interval1w),
        T::MS_IN_1_M => Ok(KlinesIntervalEnum::Interval1M),
        _ => Err(format!("Unsupported interval: {}ms", ms)),
    }
}

#[derive(Debug, PartialOrd, PartialEq)]
pub struct BNKline {
    pub open_timestamp_ms: i64,
    pub open_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
    pub close_price: Option<f64>,
    pub base_asset_volume: Option<f64>,
}

#[derive(Debug)]
pub enum BNKlineError {
    InvalidLength,
    InvalidType(String),
    ConnectionFailed(String),
}

impl fmt::Display for BNKlineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            BNKlineError::InvalidLength => write!(f, "Invalid length"),
            BNKlineError::InvalidType(string) => write!(f, "Invalid type: {}", string),
            BNKlineError::ConnectionFailed(msg) => {
                write!(f, "Binance API connection failed: {}.", msg)
            }
        }
    }
}

impl Error for BNKlineError {}

fn convert_kline_item_inner_enum_string_to_float(kline: Option<KlinesItemInner>) -> Option<f64> {
    kline.and_then(|inner| {
        if let KlinesItemInner::String(s) = inner {
            s.parse::<f64>().ok()
        } else {
            None
        }
    })
}

impl TryFrom<Vec<KlinesItemInner>> for BNKline {
    type Error = BNKlineError;

    fn try_from(vec_inner_klines: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        debug_assert_eq!(12, vec_inner_klines.len());

        let mut items = vec_inner_klines.into_iter();
        let open_timestamp_ms = match items.next().ok_or(BNKlineError::InvalidLength)? {
            KlinesItemInner::Integer(a) => a,
            _ => return Err(BNKlineError::InvalidType("open_time".to_string())),
        };

        let open_price = convert_kline_item_inner_enum_string_to_float(items.next());
        let high_price = convert_kline_item_inner_enum_string_to_float(items.next());
        let low_price = convert_kline_item_inner_enum_string_to_float(items.next());
        let close_price = convert_kline_item_inner_enum_string_to_float(items.next());
        let volume = convert_kline_item_inner_enum_string_to_float(items.next());

        Ok(BNKline {
            open_timestamp_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            base_asset_volume: volume,
        })
    }
}

impl From<BNKline> for Candle {
    fn from(bn: BNKline) -> Self {
        Candle::new(
            bn.open_timestamp_ms,
            bn.open_price.unwrap_or_default(),
            bn.high_price.unwrap_or_default(),
            bn.low_price.unwrap_or_default(),
            bn.close_price.unwrap_or_default(),
            bn.base_asset_volume.unwrap_or_default(),
        )
    }
}

async fn configure_binance_client() -> Result<RestApi, anyhow::Error> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    let rest_client = SpotRestApi::production(rest_conf);
    Ok(rest_client)
}

async fn fetch_kline_batch(
    rest_client: &RestApi,
    params: KlinesParams,
    pair_interval: &PairInterval,
) -> Result<Vec<Vec<KlinesItemInner>>, anyhow::Error> {
    match rest_client.klines(params).await {
        Ok(r) => Ok(r.data().await?),
        Err(e) => {
            if let Some(conn_err) = e.downcast_ref::<ConnectorError>() {
                match conn_err {
                    ConnectorError::TooManyRequestsError(msg) => {
                        log::warn!(
                            "{} Rate limit exceeded. Please wait and try again. {}",
                            pair_interval,
                            msg
                        );
                    }
                    ConnectorError::RateLimitBanError(msg) => {
                        log::error!(
                            "{} IP address banned due to excessive rate limits. {}",
                            pair_interval,
                            msg
                        );
                    }
                    ConnectorError::ServerError { msg, status_code } => {
                        log::error!(
                            "{} Server error: {} (status code: {:?})",
                            pair_interval,
                            msg,
                            status_code
                        );
                    }
                    ConnectorError::NetworkError(msg) => {
                        log::error!(
                            "{} Network error: Check your internet connection. {}",
                            pair_interval,
                            msg
                        );
                    }
                    ConnectorError::BadRequestError(msg) => {
                        log::warn!(
                            "{} Bad request: Verify your input parameters. {}",
                            pair_interval,
                            msg
                        );
                    }
                    other => {
                        log::error!(
                            "{} Unexpected connector error variant: {:?}",
                            pair_interval,
                            other
                        );
                    }
                }
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(conn_err.to_string()))
                        .context(format!("Binance API call failed for {}", pair_interval)),
                )
            } else {
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(e.to_string())).context(
                        format!("Unexpected error during API call for {}", pair_interval),
                    ),
                )
            }
        }
    }
}

/// Fetches the most recent `limit` klines for one pair/interval and converts
/// them into closed [Candle]s (the still-forming final kline is dropped).
pub(crate) async fn load_latest_klines(
    pair_interval: &PairInterval,
    limit: usize,
    limiter: &GlobalRateLimiter,
) -> Result<Vec<Candle>, anyhow::Error> {
    let rest_client = configure_binance_client().await?;

    limiter
        .acquire(BINANCE.limits.kline_call_weight, pair_interval.bn_name())
        .await;

    let params = KlinesParams::builder(
        pair_interval.bn_name().to_string(),
        try_interval_from_ms(pair_interval.interval_ms)
            .expect("Invalid Binance interval configuration"),
    )
    .limit(limit.min(BINANCE.limits.klines_limit as usize) as i32)
    .build()?;

    let raw = fetch_kline_batch(&rest_client, params, pair_interval).await?;
    let mut klines = raw
        .into_iter()
        .map(Vec::try_into)
        .collect::<Result<Vec<BNKline>, BNKlineError>>()
        .map_err(|e| {
            anyhow::Error::new(e).context(format!("{} kline conversion failed", pair_interval))
        })?;

    // The final row is the candle still forming; analysis only sees closed ones
    klines.pop();

    if has_duplicate_kline_open_time(&klines) {
        bail!(
            "has_duplicate_kline_open_time() failed for {} so discarding the batch!",
            pair_interval
        );
    }

    Ok(klines.into_iter().map(|bn_kline| bn_kline.into()).collect())
}

fn has_duplicate_kline_open_time(klines: &[BNKline]) -> bool {
    let mut seen_ids = HashSet::new();
    for kline in klines {
        if !seen_ids.insert(kline.open_timestamp_ms) {
            return true;
        }
    }
    false
}
