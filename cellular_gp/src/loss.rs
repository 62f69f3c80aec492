use std::sync::Arc;

use num_traits::Float;

pub trait LossFn<T: Float>: Send + Sync {
    fn loss(&self, yhat: &[T], y: &[T]) -> T;
}

pub type LossObject<T> = Arc<dyn LossFn<T> + Send + Sync>;

pub trait PointwiseLoss<T: Float>: Send + Sync {
    fn point_loss(&self, yhat: T, y: T) -> T;
}

/// Mean of a pointwise loss over all samples.
#[derive(Clone, Debug, Default)]
pub struct MeanLoss<L>(pub L);

impl<T: Float, L: PointwiseLoss<T>> LossFn<T> for MeanLoss<L> {
    fn loss(&self, yhat: &[T], y: &[T]) -> T {
        assert_eq!(yhat.len(), y.len());
        if y.is_empty() {
            return T::zero();
        }
        let n = T::from(y.len()).unwrap();
        yhat.iter()
            .copied()
            .zip(y.iter().copied())
            .map(|(a, b)| self.0.point_loss(a, b))
            .fold(T::zero(), |acc, v| acc + v)
            / n
    }
}

#[derive(Clone, Debug, Default)]
pub struct SquaredLoss;

impl<T: Float> PointwiseLoss<T> for SquaredLoss {
    fn point_loss(&self, yhat: T, y: T) -> T {
        let r = yhat - y;
        r * r
    }
}

#[derive(Clone, Debug, Default)]
pub struct AbsLoss;

impl<T: Float> PointwiseLoss<T> for AbsLoss {
    fn point_loss(&self, yhat: T, y: T) -> T {
        (yhat - y).abs()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Rmse;

impl<T: Float> LossFn<T> for Rmse {
    fn loss(&self, yhat: &[T], y: &[T]) -> T {
        MeanLoss(SquaredLoss).loss(yhat, y).sqrt()
    }
}

pub fn mse<T: Float>() -> LossObject<T> {
    Arc::new(MeanLoss(SquaredLoss))
}

pub fn mae<T: Float>() -> LossObject<T> {
    Arc::new(MeanLoss(AbsLoss))
}

pub fn rmse<T: Float>() -> LossObject<T> {
    Arc::new(Rmse)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn mse_is_mean_of_squares() {
        let l = mse::<f64>();
        assert_relative_eq!(l.loss(&[1.0, 3.0], &[0.0, 1.0]), (1.0 + 4.0) / 2.0);
        assert_relative_eq!(l.loss(&[2.0], &[2.0]), 0.0);
    }

    #[test]
    fn nan_errors_poison_the_mean() {
        let l = mse::<f64>();
        assert!(l.loss(&[f64::NAN, 1.0], &[0.0, 1.0]).is_nan());
        assert!(l.loss(&[f64::INFINITY], &[0.0]).is_infinite());
    }

    #[test]
    fn rmse_is_root_of_mse() {
        let l = rmse::<f64>();
        assert_relative_eq!(l.loss(&[3.0], &[0.0]), 3.0);
    }
}
