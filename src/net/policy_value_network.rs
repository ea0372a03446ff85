use tch::Tensor;

pub trait PolicyValueNetwork {
    /// `board`: `[batch, 8, 8, 14]`, `state`: `[batch, 6]`.
    /// Returns `(value [batch, 1], policy logits [batch, num_moves])`.
    fn forward_t(&self, board: &Tensor, state: &Tensor, train: bool) -> (Tensor, Tensor);
}
