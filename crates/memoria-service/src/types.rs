use memoria_core::CleanRecord;
use memoria_core::CleanSearchResult;

/// `recall`'s search-type selector (spec §4.5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Text,
    Semantic,
    Hybrid,
}

/// `getRelatedMemories`'s four buckets (spec §4.5.8).
#[derive(Debug, Clone, Default)]
pub struct RelatedMemories {
    pub consolidated_from: Vec<CleanRecord>,
    pub consolidated_into: Vec<CleanRecord>,
    pub similar: Vec<CleanSearchResult>,
    pub related_by_tags: Vec<CleanRecord>,
}

/// `autoLinkSimilarMemories`'s report (spec §4.5.11).
#[derive(Debug, Clone, Default)]
pub struct AutoLinkReport {
    pub linked: usize,
    pub errors: Vec<String>,
}

/// `generateEmbeddingsForExisting`'s report (spec §4.5.12).
#[derive(Debug, Clone, Default)]
pub struct BackfillReport {
    pub processed: usize,
    pub updated: usize,
    pub errors: Vec<String>,
}
