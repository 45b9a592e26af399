use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct ChromInfo {
    pub label: String,
}

/// Ordered chromosome list with a reverse lookup from label to index
///
/// The chromosome order is the order of first appearance in the copy number segment input, and
/// all deterministic genome iteration in this program follows (chrom_index, position) order.
///
#[derive(Clone, Debug, Default)]
pub struct ChromList {
    pub data: Vec<ChromInfo>,
    pub label_to_index: HashMap<String, usize>,
}

impl ChromList {
    /// Add a new chromosome and return its index
    ///
    /// Adding a chromosome label that is already present is a logic error.
    ///
    pub fn add_chrom(&mut self, label: &str) -> usize {
        assert!(
            !self.label_to_index.contains_key(label),
            "Chromosome '{label}' added to chromosome list twice"
        );
        let chrom_index = self.data.len();
        self.data.push(ChromInfo {
            label: label.to_string(),
        });
        self.label_to_index.insert(label.to_string(), chrom_index);
        chrom_index
    }

    pub fn get_index(&self, label: &str) -> Option<usize> {
        self.label_to_index.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrom_list_order() {
        let mut chrom_list = ChromList::default();
        assert!(chrom_list.is_empty());
        assert_eq!(chrom_list.add_chrom("chr2"), 0);
        assert_eq!(chrom_list.add_chrom("chr1"), 1);
        assert_eq!(chrom_list.len(), 2);
        assert_eq!(chrom_list.get_index("chr1"), Some(1));
        assert_eq!(chrom_list.get_index("chrUn_gl000220"), None);
        assert_eq!(chrom_list.data[0].label, "chr2");
    }
}
