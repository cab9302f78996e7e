use ndarray::Array2;

pub trait Optimizer {
    fn update_params(&mut self, params: &mut Array2<f64>, grad: &Array2<f64>);
}
