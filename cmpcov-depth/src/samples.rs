use std::collections::{BTreeSet, HashMap};

/// Sample name to matrix column.
///
/// Columns are assigned in sorted name order and never change once the registry is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleRegistry {
    names: Vec<String>,
    columns: HashMap<String, usize>,
}

impl SampleRegistry {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let names: Vec<String> = sorted.into_iter().collect();
        let columns = names
            .iter()
            .enumerate()
            .map(|(column, name)| (name.clone(), column))
            .collect();

        SampleRegistry { names, columns }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Names in column order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_columns_follow_sorted_names() {
        let registry = SampleRegistry::from_names(["tumor", "normal", "blood", "normal"]);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), &["blood", "normal", "tumor"]);
        assert_eq!(registry.column("blood"), Some(0));
        assert_eq!(registry.column("tumor"), Some(2));
        assert_eq!(registry.column("liver"), None);
    }

    #[rstest]
    fn test_empty_registry() {
        let registry = SampleRegistry::from_names(Vec::<String>::new());
        assert!(registry.is_empty());
    }
}
