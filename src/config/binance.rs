pub struct BinanceApiConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for BinanceApiConfig {
    fn default() -> Self {
        Self {
            timeout_ms: BINANCE.client.timeout_ms,
            retries: BINANCE.client.retries,
            backoff_ms: BINANCE.client.backoff_ms,
        }
    }
}

/// REST constraints: kline batch size, weight budget, call costs, and fan-out cap.
pub struct RestLimits {
    pub klines_limit: i32,
    pub weight_limit_minute: u32,
    pub kline_call_weight: u32,
    pub concurrent_tasks: usize,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

pub struct BinanceConfig {
    pub limits: RestLimits,
    pub client: ClientDefaults,
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    limits: RestLimits {
        klines_limit: 1000,
        weight_limit_minute: 6000,
        kline_call_weight: 2,
        concurrent_tasks: 10,
    },
    client: ClientDefaults {
        timeout_ms: 5000,
        retries: 0, // SDK-level retries off; the aggregator owns retry policy
        backoff_ms: 0,
    },
};
