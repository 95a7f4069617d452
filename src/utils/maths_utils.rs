use argminmax::ArgMinMax;

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

/// Arithmetic mean. Empty input returns 0.0 (callers guard for "no data" themselves).
pub fn mean(vec: &[f64]) -> f64 {
    if vec.is_empty() {
        return 0.0;
    }
    vec.iter().sum::<f64>() / vec.len() as f64
}
