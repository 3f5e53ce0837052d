use serde::Deserialize;

pub const DEFAULT_LOWER_LIMIT: u64 = 10;
pub const DEFAULT_UPPER_LIMIT: u64 = 100;

/// Page size bounds as supplied by configuration. Zero means "use the default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PagerOptions {
    #[serde(default)]
    pub lower_limit: u64,
    #[serde(default)]
    pub upper_limit: u64,
}

/// Resolved page size bounds. Immutable once a pager holds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    lower_limit: u64,
    upper_limit: u64,
}

impl PageBounds {
    pub fn lower_limit(&self) -> u64 {
        self.lower_limit
    }

    pub fn upper_limit(&self) -> u64 {
        self.upper_limit
    }

    /// Clamps a requested page size into `[lower, upper]`. The upper bound wins
    /// when the two are inverted.
    pub fn clamp(&self, requested: u64) -> u64 {
        clamp_page_size(requested, self.lower_limit, self.upper_limit)
    }
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            lower_limit: DEFAULT_LOWER_LIMIT,
            upper_limit: DEFAULT_UPPER_LIMIT,
        }
    }
}

impl From<PagerOptions> for PageBounds {
    fn from(opts: PagerOptions) -> Self {
        // A missing lower limit resets both bounds, a custom upper included.
        if opts.lower_limit == 0 {
            return PageBounds::default();
        }
        let upper_limit = if opts.upper_limit == 0 {
            DEFAULT_UPPER_LIMIT
        } else {
            opts.upper_limit
        };
        PageBounds {
            lower_limit: opts.lower_limit,
            upper_limit,
        }
    }
}

pub fn clamp_page_size(requested: u64, lower: u64, upper: u64) -> u64 {
    if requested > upper {
        upper
    } else if requested < lower {
        lower
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(lower_limit: u64, upper_limit: u64) -> PageBounds {
        PageBounds::from(PagerOptions {
            lower_limit,
            upper_limit,
        })
    }

    #[test]
    fn clamp_keeps_sizes_inside_bounds() {
        assert_eq!(clamp_page_size(15, 10, 100), 15);
        assert_eq!(clamp_page_size(10, 10, 100), 10);
        assert_eq!(clamp_page_size(100, 10, 100), 100);
    }

    #[test]
    fn clamp_raises_small_and_zero_sizes() {
        assert_eq!(clamp_page_size(5, 10, 100), 10);
        assert_eq!(clamp_page_size(0, 10, 100), 10);
    }

    #[test]
    fn clamp_lowers_large_sizes() {
        assert_eq!(clamp_page_size(1000, 10, 100), 100);
    }

    #[test]
    fn options_default_when_empty() {
        assert_eq!(bounds(0, 0), PageBounds::default());
        assert_eq!(PageBounds::default().lower_limit(), 10);
        assert_eq!(PageBounds::default().upper_limit(), 100);
    }

    #[test]
    fn zero_lower_limit_resets_custom_upper() {
        let b = bounds(0, 50);
        assert_eq!(b.lower_limit(), DEFAULT_LOWER_LIMIT);
        assert_eq!(b.upper_limit(), DEFAULT_UPPER_LIMIT);
    }

    #[test]
    fn zero_upper_limit_keeps_custom_lower() {
        let b = bounds(5, 0);
        assert_eq!(b.lower_limit(), 5);
        assert_eq!(b.upper_limit(), DEFAULT_UPPER_LIMIT);
    }

    #[test]
    fn both_custom_limits_survive() {
        let b = bounds(5, 50);
        assert_eq!((b.lower_limit(), b.upper_limit()), (5, 50));
        assert_eq!(b.clamp(70), 50);
        assert_eq!(b.clamp(1), 5);
    }

    #[test]
    fn options_deserialize_with_missing_fields() {
        let opts: PagerOptions = serde_json::from_str(r#"{"upper_limit": 40}"#).unwrap();
        assert_eq!(opts.lower_limit, 0);
        assert_eq!(PageBounds::from(opts), PageBounds::default());
    }
}
