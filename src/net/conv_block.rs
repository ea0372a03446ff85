use tch::{nn, Tensor};
use crate::config::NetConfig;

/// Convolution, ReLU, then batch normalization, with "same" padding.
#[derive(Debug)]
pub struct ConvBlock {
    conv: nn::Conv2D,
    bn: nn::BatchNorm,
    /// `[left, right, top, bottom]`, the last two axes of an NCHW tensor.
    padding: [i64; 4],
}

/// Even kernels get the extra row or column of padding after the input.
pub const fn same_padding(kernel_size: [i64; 2]) -> [i64; 4] {
    let [kernel_height, kernel_width] = kernel_size;
    let (top, bottom) = ((kernel_height - 1) / 2, kernel_height - 1 - (kernel_height - 1) / 2);
    let (left, right) = ((kernel_width - 1) / 2, kernel_width - 1 - (kernel_width - 1) / 2);
    [left, right, top, bottom]
}

impl ConvBlock {
    pub fn new(vs: &nn::Path, in_channels: i64, out_channels: i64, kernel_size: [i64; 2], config: &NetConfig) -> ConvBlock {
        let conv = nn::conv(
            vs / "conv",
            in_channels,
            out_channels,
            kernel_size,
            nn::ConvConfigND::<[i64; 2]>::default(),
        );

        let bn = nn::batch_norm2d(
            vs / "bn",
            out_channels,
            nn::BatchNormConfig {
                momentum: config.batch_norm_momentum,
                eps: config.batch_norm_eps,
                ..Default::default()
            },
        );

        ConvBlock {
            conv,
            bn,
            padding: same_padding(kernel_size),
        }
    }

    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let xs = if self.padding == [0; 4] {
            xs.shallow_clone()
        } else {
            xs.constant_pad_nd(self.padding)
        };
        xs.apply(&self.conv).relu().apply_t(&self.bn, train)
    }
}

#[cfg(test)]
mod tests {
    use tch::{Device, Kind};
    use super::*;

    #[test]
    fn test_same_padding() {
        assert_eq!(same_padding([1, 1]), [0, 0, 0, 0]);
        assert_eq!(same_padding([3, 3]), [1, 1, 1, 1]);
        assert_eq!(same_padding([15, 15]), [7, 7, 7, 7]);
        assert_eq!(same_padding([1, 8]), [3, 4, 0, 0]);
        assert_eq!(same_padding([8, 1]), [0, 0, 3, 4]);
    }

    #[test]
    fn test_conv_block_keeps_extent() {
        let vs = nn::VarStore::new(Device::Cpu);
        let config = NetConfig::cpu();
        let xs = Tensor::rand([3, 14, 8, 8], (Kind::Float, Device::Cpu));

        for kernel_size in [[3, 3], [5, 5], [9, 9], [15, 15], [1, 8], [8, 1], [1, 1]] {
            let block = ConvBlock::new(&(vs.root() / format!("k{}x{}", kernel_size[0], kernel_size[1])), 14, 16, kernel_size, &config);
            let out = block.forward_t(&xs, true);
            assert_eq!(out.size(), [3, 16, 8, 8], "kernel {:?}", kernel_size);
        }
    }

    #[test]
    fn test_eval_mode_leaves_running_stats() {
        let vs = nn::VarStore::new(Device::Cpu);
        let block = ConvBlock::new(&vs.root(), 14, 4, [3, 3], &NetConfig::cpu());
        let xs = Tensor::rand([2, 14, 8, 8], (Kind::Float, Device::Cpu));

        let before = block.bn.running_mean.copy();
        let _ = block.forward_t(&xs, false);
        assert!(block.bn.running_mean.allclose(&before, 0., 0., false));

        let _ = block.forward_t(&xs, true);
        assert!(!block.bn.running_mean.allclose(&before, 0., 0., false));
    }
}
