use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::{asset::Asset, event::EventRecord, result::NdsResult};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("Shape {dimensions:?} holds {expected} elements but {actual} were given")]
    ShapeMismatch {
        dimensions: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("Shape {dimensions:?} overflows the element count")]
    TooLarge { dimensions: Vec<usize> },
}

/// Vectorized data in a float view, a quantized one-byte-per-element view,
/// or both. Every view holds exactly [`Tensor::element_count`] elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    dimensions: Vec<usize>,
    floats: Option<Vec<f32>>,
    quantized: Option<Vec<u8>>,
}

impl Tensor {
    pub fn from_floats(dimensions: Vec<usize>, values: Vec<f32>) -> Result<Self, TensorError> {
        check_len(&dimensions, values.len())?;
        Ok(Self {
            dimensions,
            floats: Some(values),
            quantized: None,
        })
    }

    pub fn from_quantized(dimensions: Vec<usize>, bytes: Vec<u8>) -> Result<Self, TensorError> {
        check_len(&dimensions, bytes.len())?;
        Ok(Self {
            dimensions,
            floats: None,
            quantized: Some(bytes),
        })
    }

    /// A one-dimensional tensor over `values`.
    pub fn vector(values: Vec<f32>) -> Self {
        Self {
            dimensions: vec![values.len()],
            floats: Some(values),
            quantized: None,
        }
    }

    pub fn with_quantized(self, bytes: Vec<u8>) -> Result<Self, TensorError> {
        check_len(&self.dimensions, bytes.len())?;
        Ok(Self {
            quantized: Some(bytes),
            ..self
        })
    }

    pub fn with_floats(self, values: Vec<f32>) -> Result<Self, TensorError> {
        check_len(&self.dimensions, values.len())?;
        Ok(Self {
            floats: Some(values),
            ..self
        })
    }

    pub fn as_floats(&self) -> Option<&[f32]> {
        self.floats.as_deref()
    }

    pub fn as_quantized(&self) -> Option<&[u8]> {
        self.quantized.as_deref()
    }

    pub fn supports_floats(&self) -> bool {
        self.floats.is_some()
    }

    pub fn supports_quantization(&self) -> bool {
        self.quantized.is_some()
    }

    /// `[128]` is a 128 wide vector, `[10, 20]` a 10x20 matrix.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Product of the dimensions; a scalar (no dimensions) has one element.
    pub fn element_count(&self) -> usize {
        self.dimensions.iter().product()
    }
}

fn check_len(dimensions: &[usize], actual: usize) -> Result<(), TensorError> {
    let expected = dimensions
        .iter()
        .try_fold(1usize, |count, dim| count.checked_mul(*dim))
        .ok_or_else(|| TensorError::TooLarge {
            dimensions: dimensions.to_vec(),
        })?;
    if expected != actual {
        return Err(TensorError::ShapeMismatch {
            dimensions: dimensions.to_vec(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Context for AI consumers, optionally with an embedding of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Semantic {
    context: BTreeMap<String, String>,
    embedding: Option<Tensor>,
}

impl Semantic {
    pub fn new(context: BTreeMap<String, String>) -> Self {
        Self {
            context,
            embedding: None,
        }
    }

    pub fn with_embedding(self, embedding: Tensor) -> Self {
        Self {
            embedding: Some(embedding),
            ..self
        }
    }

    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    pub fn get_context(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    pub fn has_context(&self, key: &str) -> bool {
        self.context.contains_key(key)
    }

    pub fn embedding(&self) -> Option<&Tensor> {
        self.embedding.as_ref()
    }
}

/// Turns assets and events into [`Semantic`] values and searches over them.
#[async_trait]
pub trait SemanticService: Send + Sync {
    async fn semanticize_asset(&self, asset: &Asset) -> NdsResult<Semantic>;

    async fn semanticize_event(&self, record: &EventRecord) -> NdsResult<Semantic>;

    async fn vectorize(&self, semantic: &Semantic) -> NdsResult<Tensor>;

    /// At most `limit` results, closest first.
    async fn search(&self, query: &Semantic, limit: usize) -> NdsResult<Vec<Semantic>>;
}
