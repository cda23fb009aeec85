//! Argument validation rules, applied before any API call.

use crate::errors::Error;

const NAMESPACE_MAX_LEN: usize = 63;
const NAME_MAX_LEN: usize = 253;
const PREFIX_MAX_LEN: usize = 50;

fn is_lowercase_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

fn matches_namespace_or_name_pattern(s: &str, extra_mid_chars: &[char]) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else { return false };
    if !is_lowercase_alnum(first) {
        return false;
    }
    let Some(last) = s.chars().last() else { return false };
    if !is_lowercase_alnum(last) {
        return false;
    }
    s.chars()
        .all(|c| is_lowercase_alnum(c) || c == '-' || extra_mid_chars.contains(&c))
}

/// Validates a namespace: non-empty, ≤63 chars,
/// `^[a-z0-9]([-a-z0-9]*[a-z0-9])?$`.
///
/// The cluster-wide sentinel (empty string, meaning "all namespaces") is
/// accepted only when `required` is `false`.
pub fn validate_namespace(namespace: &str, required: bool) -> Result<(), Error> {
    if namespace.is_empty() {
        if required {
            return Err(Error::Validation {
                field: "namespace",
                message: "namespace must not be empty".to_string(),
            });
        }
        return Ok(());
    }
    if namespace.len() > NAMESPACE_MAX_LEN || !matches_namespace_or_name_pattern(namespace, &[]) {
        return Err(Error::Validation {
            field: "namespace",
            message: format!("{namespace:?} is not a valid namespace"),
        });
    }
    Ok(())
}

/// Validates a resource name: non-empty, ≤253 chars,
/// `^[a-z0-9]([-a-z0-9.]*[a-z0-9])?$`.
pub fn validate_name(name: &str) -> Result<(), Error> {
    if name.is_empty() || name.len() > NAME_MAX_LEN || !matches_namespace_or_name_pattern(name, &['.']) {
        return Err(Error::Validation {
            field: "name",
            message: format!("{name:?} is not a valid resource name"),
        });
    }
    Ok(())
}

/// Validates a pod-name prefix: non-empty, ≤50 chars, alphanumeric
/// lowercase with hyphens and dot-separated segments.
pub fn validate_prefix(prefix: &str) -> Result<(), Error> {
    if prefix.is_empty() || prefix.len() > PREFIX_MAX_LEN || !matches_namespace_or_name_pattern(prefix, &['.']) {
        return Err(Error::Validation {
            field: "prefix",
            message: format!("{prefix:?} is not a valid pod-name prefix"),
        });
    }
    Ok(())
}

/// Validates a rebalance rate: `0 <= rate <= 1`.
pub fn validate_rate(rate: f64) -> Result<(), Error> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(Error::Validation {
            field: "rate",
            message: format!("{rate} is outside the allowed range [0, 1]"),
        });
    }
    Ok(())
}

/// Validates `--minPods`: capped at 1000.
pub fn validate_min_pods(min_pods: u32) -> Result<(), Error> {
    if min_pods > 1000 {
        return Err(Error::Validation {
            field: "minPods",
            message: format!("{min_pods} exceeds the maximum of 1000"),
        });
    }
    Ok(())
}
