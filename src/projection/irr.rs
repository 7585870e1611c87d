//! Internal Rate of Return (IRR) of the purchase
//!
//! The investment stream is the initial cost at t=0, each holding year's net
//! cashflow, and the sale proceeds folded into the final year.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;

/// Largest |NPV|, relative to the largest cashflow, accepted from Newton's method
const NPV_TOLERANCE: f64 = 1e-6;

/// Lowest annual rate searched (-99%)
const RATE_FLOOR: f64 = -0.99;

/// Highest annual rate searched (1000%)
const RATE_CEILING: f64 = 10.0;

/// Annual IRR of a yearly cashflow stream using Newton-Raphson with a
/// bisection fallback.
///
/// Returns `None` when the stream is empty, has no sign change, or no root
/// lies in the searched interval.
pub fn calculate_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }
    if cashflows.iter().all(|cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    let has_inflow = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let scale = cashflows.iter().fold(0.0_f64, |acc, cf| acc.max(cf.abs()));
    let mut rate = 0.05;
    for _ in 0..MAX_ITERATIONS {
        let (value, slope) = npv_and_derivative(cashflows, rate);
        if slope.abs() < 1e-20 {
            break;
        }

        let next = rate - value / slope;
        if !next.is_finite() || next <= RATE_FLOOR || next >= RATE_CEILING {
            break;
        }
        if (next - rate).abs() < TOLERANCE {
            if npv(cashflows, next).abs() < NPV_TOLERANCE * scale {
                return Some(next);
            }
            break;
        }
        rate = next;
    }

    irr_bisection(cashflows)
}

/// Stream fed to [`calculate_irr`]: `[-initial_cost, cf1, ..., cfN + sale_proceeds]`.
///
/// With no holding years the sale lands in year 0 alongside the purchase.
pub fn investment_stream(initial_cost: f64, net_cashflows: &[f64], sale_proceeds: f64) -> Vec<f64> {
    let mut stream = Vec::with_capacity(net_cashflows.len() + 1);
    stream.push(-initial_cost);
    stream.extend_from_slice(net_cashflows);
    if let Some(last) = stream.last_mut() {
        *last += sale_proceeds;
    }
    stream
}

fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    cashflows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, slope), (t, &cf)| {
            let discount = (1.0 + rate).powi(t as i32);
            (
                npv + cf / discount,
                slope - t as f64 * cf / (discount * (1.0 + rate)),
            )
        })
}

fn npv(cashflows: &[f64], rate: f64) -> f64 {
    npv_and_derivative(cashflows, rate).0
}

fn irr_bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = RATE_FLOOR;
    let mut high = RATE_CEILING;
    let mut npv_low = npv(cashflows, low);

    if npv_low * npv(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_period() {
        let irr = calculate_irr(&[-1000.0, 1100.0]).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_level_income_with_sale() {
        // 5% yield every year and the principal back at the end
        let irr = calculate_irr(&[-100.0, 5.0, 5.0, 5.0, 105.0]).unwrap();
        assert_abs_diff_eq!(irr, 0.05, epsilon = 1e-8);
    }

    #[test]
    fn test_loss_gives_negative_rate() {
        let irr = calculate_irr(&[-100.0, 0.0, 81.0]).unwrap();
        assert_abs_diff_eq!(irr, -0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(calculate_irr(&[100.0, 10.0]), None);
        assert_eq!(calculate_irr(&[-100.0, -10.0]), None);
        assert_eq!(calculate_irr(&[]), None);
        assert_eq!(calculate_irr(&[0.0, 0.0]), Some(0.0));
    }

    #[test]
    fn test_no_root_in_searched_range() {
        // NPV stays negative down to the -99% floor
        assert_eq!(calculate_irr(&[-100.0, 0.5]), None);
    }

    #[test]
    fn test_root_reported_not_search_bound() {
        // Newton overshoots towards the ceiling; the only root is near -74%
        let stream = [-100.0, -10.0, -10.0, 5.0];
        let irr = calculate_irr(&stream).unwrap();
        assert_abs_diff_eq!(irr, -0.7409492448776918, epsilon = 1e-8);
        assert_abs_diff_eq!(npv(&stream, irr), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_deep_loss_still_found() {
        let irr = calculate_irr(&[-100.0, 2.0]).unwrap();
        assert_abs_diff_eq!(irr, -0.98, epsilon = 1e-8);
    }

    #[test]
    fn test_investment_stream() {
        assert_eq!(
            investment_stream(100.0, &[5.0, 5.0], 90.0),
            vec![-100.0, 5.0, 95.0]
        );
        assert_eq!(investment_stream(100.0, &[], 90.0), vec![-10.0]);
    }
}
