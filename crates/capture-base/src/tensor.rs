use std::fmt;

#[derive(Debug, PartialEq)]
pub enum TensorError {
    ShapeOverflow,
    ShapeMismatch { expected: usize, got: usize },
    NotHwc(usize),
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeOverflow => write!(f, "shape dimensions overflow when multiplied"),
            TensorError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
            TensorError::NotHwc(ndim) => {
                write!(f, "expected [height, width, channels] layout, got {ndim} dimensions")
            }
        }
    }
}

impl std::error::Error for TensorError {}

/// Dense buffer with an explicit shape.
///
/// Pixel data throughout the capture crates uses HWC layout:
/// `[height, width, channels]`, row-major, no padding.
#[derive(Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T> fmt::Debug for Tensor<T> {
    // frames are large, so only the shape and length are printed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("len", &self.data.len())
            .finish()
    }
}

fn element_count(shape: &[usize]) -> Result<usize, TensorError> {
    let mut product: usize = 1;
    for &dim in shape {
        product = product
            .checked_mul(dim)
            .ok_or(TensorError::ShapeOverflow)?;
    }
    Ok(product)
}

impl<T> Tensor<T> {
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let product = element_count(&shape)?;
        if product != data.len() {
            return Err(TensorError::ShapeMismatch {
                expected: product,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build a `[height, width, channels]` tensor.
    pub fn hwc(height: usize, width: usize, channels: usize, data: Vec<T>) -> Result<Self, TensorError> {
        Self::new(vec![height, width, channels], data)
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check the tensor is laid out as `[height, width, channels]`.
    pub fn ensure_hwc(&self) -> Result<(), TensorError> {
        if self.ndim() != 3 {
            return Err(TensorError::NotHwc(self.ndim()));
        }
        Ok(())
    }

    // The accessors below assume HWC; call ensure_hwc first on foreign data.

    pub fn height(&self) -> usize {
        self.shape[0]
    }

    pub fn width(&self) -> usize {
        self.shape[1]
    }

    pub fn channels(&self) -> usize {
        self.shape[2]
    }
}
