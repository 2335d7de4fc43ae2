use std::fmt;

use ndarray::{Array2, Array3, Axis, Zip};

use crate::brdf::ProcessError;
use crate::brdf::processor::check_shape;

/// Statistics of one kernel over the usable pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorSummary {
    pub valid_pixels: usize,
    pub total_pixels: usize,
    /// One entry per kernel; `None` when no usable pixel holds a value.
    pub kernels: Vec<Option<KernelStats>>,
}

/// Fails when the mask grid differs from the kernels grid.
pub fn summarize(
    kernels: &Array3<f32>,
    mask: &Array2<bool>,
) -> Result<DescriptorSummary, ProcessError> {
    let (_, rows, cols) = kernels.dim();
    check_shape((rows, cols), mask)?;

    let kernel_stats = kernels
        .axis_iter(Axis(0))
        .map(|kernel| {
            let mut values = Vec::new();
            Zip::from(&kernel).and(mask).for_each(|&value, &usable| {
                if usable && !value.is_nan() {
                    values.push(value);
                }
            });

            if values.is_empty() {
                return None;
            }

            Some(KernelStats {
                min: values.iter().fold(f32::INFINITY, |a, &b| a.min(b)),
                max: values.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)),
                mean: values.iter().sum::<f32>() / values.len() as f32,
            })
        })
        .collect();

    Ok(DescriptorSummary {
        valid_pixels: mask.iter().filter(|&&usable| usable).count(),
        total_pixels: mask.len(),
        kernels: kernel_stats,
    })
}

impl fmt::Display for DescriptorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let share = if self.total_pixels == 0 {
            0.0
        } else {
            100.0 * self.valid_pixels as f32 / self.total_pixels as f32
        };

        write!(
            f,
            "  Valid pixels: {} / {} ({:.1}%)",
            self.valid_pixels, self.total_pixels, share
        )?;

        for (index, stats) in self.kernels.iter().enumerate() {
            match stats {
                Some(stats) => write!(
                    f,
                    "\n  Kernel {}: min {:.3}, max {:.3}, mean {:.3}",
                    index, stats.min, stats.max, stats.mean
                )?,
                None => write!(f, "\n  Kernel {}: no valid values", index)?,
            }
        }

        Ok(())
    }
}
