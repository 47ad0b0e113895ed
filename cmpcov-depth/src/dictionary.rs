use noodles::sam;

/// One `@SQ` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    pub name: String,
    pub length: u32,
}

/// The ordered reference sequences of a BAM header. Record reference ids index into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDictionary {
    sequences: Vec<ReferenceSequence>,
}

impl ReferenceDictionary {
    pub fn from_header(header: &sam::Header) -> Self {
        let sequences = header
            .reference_sequences()
            .iter()
            .map(|(name, map)| ReferenceSequence {
                name: name.to_string(),
                length: u32::try_from(map.length().get()).unwrap_or(u32::MAX),
            })
            .collect();

        ReferenceDictionary { sequences }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.sequences.iter().position(|seq| seq.name == name)
    }

    pub fn get(&self, reference_id: usize) -> Option<&ReferenceSequence> {
        self.sequences.get(reference_id)
    }

    /// Display name of a reference id, `*` when unplaced or unknown
    pub fn name(&self, reference_id: Option<usize>) -> &str {
        reference_id
            .and_then(|id| self.get(id))
            .map_or("*", |seq| seq.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceSequence> {
        self.sequences.iter()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl From<Vec<ReferenceSequence>> for ReferenceDictionary {
    fn from(sequences: Vec<ReferenceSequence>) -> Self {
        ReferenceDictionary { sequences }
    }
}
