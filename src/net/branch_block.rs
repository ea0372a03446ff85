use tch::{nn, Tensor};
use crate::config::NetConfig;
use crate::net::conv_block::ConvBlock;

/// Parallel conv blocks over the same input, concatenated along the channel axis.
#[derive(Debug)]
pub struct BranchBlock {
    branches: Vec<ConvBlock>,
    out_channels: i64,
}

impl BranchBlock {
    pub fn new(vs: &nn::Path, in_channels: i64, filters: i64, kernel_sizes: &[[i64; 2]], config: &NetConfig) -> BranchBlock {
        let branches = kernel_sizes
            .iter()
            .enumerate()
            .map(|(i, &kernel_size)| ConvBlock::new(&(vs / format!("branch_{}", i)), in_channels, filters, kernel_size, config))
            .collect();

        BranchBlock {
            branches,
            out_channels: filters * kernel_sizes.len() as i64,
        }
    }

    pub const fn out_channels(&self) -> i64 {
        self.out_channels
    }

    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let outputs: Vec<Tensor> = self.branches
            .iter()
            .map(|branch| branch.forward_t(xs, train))
            .collect();
        Tensor::cat(&outputs, 1)
    }
}

#[cfg(test)]
mod tests {
    use tch::{Device, Kind};
    use super::*;

    #[test]
    fn test_branch_block_concatenates() {
        let vs = nn::VarStore::new(Device::Cpu);
        let kernel_sizes = [[3, 3], [5, 5], [1, 8]];
        let block = BranchBlock::new(&vs.root(), 14, 16, &kernel_sizes, &NetConfig::cpu());
        assert_eq!(block.out_channels(), 48);

        let xs = Tensor::rand([2, 14, 8, 8], (Kind::Float, Device::Cpu));
        assert_eq!(block.forward_t(&xs, false).size(), [2, 48, 8, 8]);

        // conv weight + bias, batch norm weight + bias, per branch
        assert_eq!(vs.trainable_variables().len(), 4 * kernel_sizes.len());
    }
}
