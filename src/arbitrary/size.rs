/// how many distinct values an arbitrary can produce. combinators
/// that cannot know exactly (filters, chains, patterns) report an
/// estimate with a 95% credible interval instead; arithmetic on
/// sizes saturates rather than overflows.
#[derive(Debug, Clone, PartialEq)]
pub enum Size {
    Exact(u128),
    Estimated { value: u128, interval: (f64, f64) },
}

impl Size {
    pub fn value(&self) -> u128 {
        match self {
            Self::Exact(n) => *n,
            Self::Estimated { value, .. } => *value,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    pub fn interval(&self) -> Option<(f64, f64)> {
        match self {
            Self::Exact(_) => None,
            Self::Estimated { interval, .. } => Some(*interval),
        }
    }

    /// an estimate whose interval collapses onto the value
    pub fn degenerate(value: u128) -> Self {
        Self::Estimated {
            value,
            interval: (0., value as f64),
        }
    }

    /// combine child sizes: exactness survives only if all parts are exact
    pub fn sum(sizes: impl IntoIterator<Item = Size>) -> Size {
        let mut total = 0u128;
        let mut exact = true;
        for size in sizes {
            total = total.saturating_add(size.value());
            exact &= size.is_exact();
        }
        match exact {
            true => Size::Exact(total),
            false => Size::degenerate(total),
        }
    }

    pub fn product(sizes: impl IntoIterator<Item = Size>) -> Size {
        let mut total = 1u128;
        let mut exact = true;
        for size in sizes {
            total = total.saturating_mul(size.value());
            exact &= size.is_exact();
        }
        match exact {
            true => Size::Exact(total),
            false => Size::degenerate(total),
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{}", n),
            Self::Estimated { value, interval } => {
                write!(f, "~{} [{:.0}, {:.0}]", value, interval.0, interval.1)
            }
        }
    }
}
