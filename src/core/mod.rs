pub mod confidence;
pub mod detectors;
pub mod lexicon;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod profile;
pub mod registry;
pub mod relationships;
pub mod segmenter;
pub mod strategy;
pub mod timeline;
