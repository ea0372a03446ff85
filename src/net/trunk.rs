use tch::{nn, Tensor};
use crate::config::NetConfig;
use crate::consts::BOARD_INPUT_CHANNELS;
use crate::net::branch_block::BranchBlock;
use crate::net::conv_block::ConvBlock;

// Board inputs are bitboards, so nothing is normalized before block 1.
pub const B1_KERNELS: [[i64; 2]; 6] = [[3, 3], [5, 5], [9, 9], [15, 15], [1, 8], [8, 1]];
pub const B1_FILTERS: i64 = 16;
pub const B1_CHANNELS: i64 = B1_KERNELS.len() as i64 * B1_FILTERS; // 96

pub const B3_KERNELS: [[i64; 2]; 2] = [[3, 3], [5, 5]];
pub const B3_FILTERS: i64 = 32;

pub const B4_KERNELS: [[i64; 2]; 2] = [[3, 3], [5, 5]];
pub const B4_FILTERS: i64 = 32;

pub const B5_KERNELS: [[i64; 2]; 1] = [[3, 3]];
pub const B5_FILTERS: i64 = 64;

pub const POOL_SIZE: [i64; 2] = [2, 2];
pub const POOL_STRIDE: [i64; 2] = [1, 1];

pub const TRUNK_OUTPUT_CHANNELS: i64 = B5_KERNELS.len() as i64 * B5_FILTERS; // 64
pub const TRUNK_OUTPUT_EXTENT: i64 = 8 - (POOL_SIZE[0] - POOL_STRIDE[0]); // 7
pub const TRUNK_OUTPUT_LEN: i64 = TRUNK_OUTPUT_CHANNELS * TRUNK_OUTPUT_EXTENT * TRUNK_OUTPUT_EXTENT;

/// A 1x1 adapter projecting the previous residual to this stage's depth,
/// summed with a branch block applied to the adapter output.
#[derive(Debug)]
pub struct ResidualStage {
    adapter: ConvBlock,
    branches: BranchBlock,
}

impl ResidualStage {
    pub fn new(vs: &nn::Path, in_channels: i64, filters: i64, kernel_sizes: &[[i64; 2]], config: &NetConfig) -> ResidualStage {
        let adapter_channels = filters * kernel_sizes.len() as i64;
        let adapter = ConvBlock::new(&(vs / "adapter"), in_channels, adapter_channels, [1, 1], config);
        let branches = BranchBlock::new(&(vs / "branches"), adapter_channels, filters, kernel_sizes, config);
        ResidualStage { adapter, branches }
    }

    pub const fn out_channels(&self) -> i64 {
        self.branches.out_channels()
    }

    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let adapted = self.adapter.forward_t(xs, train);
        self.branches.forward_t(&adapted, train) + adapted
    }
}

/// The spatial feature extractor: `[batch, 14, 8, 8]` to `[batch, 64, 7, 7]`.
///
/// Every stage reads the previous stage's residual sum before pooling, so
/// only the last stage's pool reaches the output. Pooling has stride 1 and
/// trims one row and column instead of downsampling.
#[derive(Debug)]
pub struct Trunk {
    block1: BranchBlock,
    block2: ConvBlock,
    stages: Vec<ResidualStage>,
}

impl Trunk {
    pub fn new(vs: &nn::Path, config: &NetConfig) -> Trunk {
        let block1 = BranchBlock::new(&(vs / "block1"), BOARD_INPUT_CHANNELS, B1_FILTERS, &B1_KERNELS, config);
        let block2 = ConvBlock::new(&(vs / "block2"), B1_CHANNELS, B1_CHANNELS, [1, 1], config);

        let block3 = ResidualStage::new(&(vs / "block3"), B1_CHANNELS, B3_FILTERS, &B3_KERNELS, config);
        let block4 = ResidualStage::new(&(vs / "block4"), block3.out_channels(), B4_FILTERS, &B4_KERNELS, config);
        let block5 = ResidualStage::new(&(vs / "block5"), block4.out_channels(), B5_FILTERS, &B5_KERNELS, config);

        Trunk {
            block1,
            block2,
            stages: vec![block3, block4, block5],
        }
    }

    pub fn forward_t(&self, board: &Tensor, train: bool) -> Tensor {
        let xs = self.block1.forward_t(board, train);
        let mut residual = self.block2.forward_t(&xs, train) + xs;
        for stage in &self.stages {
            residual = stage.forward_t(&residual, train);
        }
        residual.max_pool2d(POOL_SIZE, POOL_STRIDE, [0, 0], [1, 1], false)
    }
}
