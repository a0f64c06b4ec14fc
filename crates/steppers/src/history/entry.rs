use stagger_core::TimeTag;

/// A time-tagged sample recorded on one side of an interface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry<T> {
    pub tag: TimeTag,
    pub sample: T,
}

impl<T> Entry<T> {
    /// Creates a new entry from a tag and sample.
    pub fn new(tag: TimeTag, sample: T) -> Self {
        Self { tag, sample }
    }
}
