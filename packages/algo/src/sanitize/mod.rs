//! Data Sanitization
//!
//! Numerical stability utilities shared by the estimators.
//!
//! Functions:
//! - Invalid value detection
//! - Guarded mean / standard deviation
//! - Unit-interval clamping

/// 检查数组是否包含无效值 (NaN 或 Inf)
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// 过滤掉 NaN / Inf，保留有限值
pub fn finite_values(arr: &[f64]) -> Vec<f64> {
    arr.iter().copied().filter(|x| x.is_finite()).collect()
}

/// 算术平均值，空输入返回 None
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 总体标准差 (除以 n)，空输入返回 0
pub fn population_std_dev(values: &[f64]) -> f64 {
    let Some(mu) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// 限制到 [0, 1]，NaN 视为 0
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// 安全除法，分母接近 0 时返回 fallback
pub fn safe_div(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator.abs() < crate::EPSILON || !denominator.is_finite() {
        fallback
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_invalid_values_with_valid_array() {
        assert!(!has_invalid_values(&[0.0, 1.5, -2.0]));
    }

    #[test]
    fn test_has_invalid_values_with_nan_and_infinity() {
        assert!(has_invalid_values(&[0.0, f64::NAN]));
        assert!(has_invalid_values(&[f64::NEG_INFINITY]));
    }

    #[test]
    fn test_finite_values_drops_invalid() {
        let cleaned = finite_values(&[0.5, f64::NAN, 0.25, f64::INFINITY]);
        assert_eq!(cleaned, vec![0.5, 0.25]);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[7.0]), 0.0);
        assert!((population_std_dev(&[20.0, 30.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(0.3), 0.3);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(1.0, 0.0, 0.5), 0.5);
        assert_eq!(safe_div(1.0, f64::INFINITY, 0.5), 0.5);
        assert_eq!(safe_div(1.0, 4.0, 0.5), 0.25);
    }
}
