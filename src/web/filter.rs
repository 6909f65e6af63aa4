// ABOUTME: Case-insensitive search filter over labelled experiment entries

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Indices of entries that stay visible, in input order
    pub visible: Vec<usize>,
    pub total: usize,
}

impl FilterOutcome {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// `Displaying V of T` when something is hidden, empty otherwise
    pub fn summary(&self) -> String {
        if self.visible.len() < self.total {
            format!("Displaying {} of {}", self.visible.len(), self.total)
        } else {
            String::new()
        }
    }
}

/// Keep entries whose label contains `query`, ignoring case. An empty query keeps everything.
pub fn filter_entries<S: AsRef<str>>(query: &str, entries: &[S]) -> FilterOutcome {
    let needle = query.to_uppercase();
    let visible = entries
        .iter()
        .enumerate()
        .filter(|(_, label)| {
            let label: &str = (*label).as_ref();
            label.to_uppercase().contains(&needle)
        })
        .map(|(i, _)| i)
        .collect();

    FilterOutcome {
        visible,
        total: entries.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_substring() {
        let outcome = filter_entries("job", &["job-1", "job-2", "foo"]);
        assert_eq!(outcome.visible, vec![0, 1]);
        assert_eq!(outcome.summary(), "Displaying 2 of 3");
    }

    #[test]
    fn ignores_case() {
        let outcome = filter_entries("MNIST", &["mnist_baseline", "cifar", "Mnist_wide"]);
        assert_eq!(outcome.visible, vec![0, 2]);
    }

    #[test]
    fn everything_visible_has_no_summary() {
        let outcome = filter_entries("", &["a", "b"]);
        assert_eq!(outcome.visible_count(), 2);
        assert_eq!(outcome.summary(), "");
    }
}
