//! Reiner-Rubinstein barrier formulas (continuous monitoring).
//!
//! Eight variants: {up, down} × {in, out} × {call, put}. Prices are built
//! from the four standard blocks A/B/C/D with the option sign φ (+1 call,
//! −1 put) and barrier sign η (+1 down, −1 up); knock-out prices follow from
//! in-out parity, so `in + out = vanilla` holds by construction for zero
//! rebate.
//!
//! Rebates are paid only when the option is knocked out (or the barrier is
//! already breached at inception), discounted from maturity, matching the
//! Monte Carlo driver's payoff convention.

use super::{black_scholes_call, black_scholes_put};
use mc_core::math::norm_cdf;

/// The A/B/C/D blocks of the Reiner-Rubinstein decomposition.
struct RrBlocks {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

#[allow(clippy::many_single_char_names)]
fn rr_blocks(
    spot: f64,
    strike: f64,
    barrier: f64,
    rate: f64,
    vol: f64,
    time: f64,
    phi: f64,
    eta: f64,
) -> RrBlocks {
    let sqt = vol * time.sqrt();
    let mu = rate / (vol * vol) - 0.5;
    let df = (-rate * time).exp();

    let x1 = (spot / strike).ln() / sqt + (1.0 + mu) * sqt;
    let x2 = (spot / barrier).ln() / sqt + (1.0 + mu) * sqt;
    let y1 = (barrier * barrier / (spot * strike)).ln() / sqt + (1.0 + mu) * sqt;
    let y2 = (barrier / spot).ln() / sqt + (1.0 + mu) * sqt;

    let pow_spot = (barrier / spot).powf(2.0 * (mu + 1.0));
    let pow_strike = (barrier / spot).powf(2.0 * mu);

    let a = phi * spot * norm_cdf(phi * x1) - phi * strike * df * norm_cdf(phi * (x1 - sqt));
    let b = phi * spot * norm_cdf(phi * x2) - phi * strike * df * norm_cdf(phi * (x2 - sqt));
    let c = phi * spot * pow_spot * norm_cdf(eta * y1)
        - phi * strike * df * pow_strike * norm_cdf(eta * (y1 - sqt));
    let d = phi * spot * pow_spot * norm_cdf(eta * y2)
        - phi * strike * df * pow_strike * norm_cdf(eta * (y2 - sqt));

    RrBlocks { a, b, c, d }
}

/// Which side the barrier sits on and the payoff sign.
#[derive(Clone, Copy)]
enum Variant {
    DownCall,
    UpCall,
    DownPut,
    UpPut,
}

impl Variant {
    fn is_down(self) -> bool {
        matches!(self, Variant::DownCall | Variant::DownPut)
    }

    fn is_call(self) -> bool {
        matches!(self, Variant::DownCall | Variant::UpCall)
    }

    fn vanilla(self, spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
        if self.is_call() {
            black_scholes_call(spot, strike, rate, vol, time)
        } else {
            black_scholes_put(spot, strike, rate, vol, time)
        }
    }
}

/// Knock-in price for one variant; the shared entry point behind the eight
/// public functions.
fn knock_in(
    variant: Variant,
    spot: f64,
    strike: f64,
    barrier: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    let breached = if variant.is_down() {
        spot <= barrier
    } else {
        spot >= barrier
    };
    if breached {
        return variant.vanilla(spot, strike, rate, vol, time);
    }

    if time <= 0.0 || vol <= 0.0 {
        // Not breached at inception and no remaining diffusion: the barrier
        // is never touched, so the knock-in expires worthless.
        return 0.0;
    }

    let phi = if variant.is_call() { 1.0 } else { -1.0 };
    let eta = if variant.is_down() { 1.0 } else { -1.0 };
    let t = rr_blocks(spot, strike, barrier, rate, vol, time, phi, eta);

    let price = match (variant, strike >= barrier) {
        (Variant::DownCall, true) => t.c,
        (Variant::DownCall, false) => t.a - t.b + t.d,
        (Variant::UpCall, true) => t.a,
        (Variant::UpCall, false) => t.b - t.c + t.d,
        (Variant::DownPut, true) => t.b - t.c + t.d,
        (Variant::DownPut, false) => t.a,
        (Variant::UpPut, true) => t.a - t.b + t.d,
        (Variant::UpPut, false) => t.c,
    };

    price.max(0.0)
}

/// Knock-out price via in-out parity, plus the discounted rebate on the
/// breached branch.
fn knock_out(
    variant: Variant,
    spot: f64,
    strike: f64,
    barrier: f64,
    rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    let breached = if variant.is_down() {
        spot <= barrier
    } else {
        spot >= barrier
    };
    if breached {
        return rebate * (-rate * time.max(0.0)).exp();
    }

    let vanilla = variant.vanilla(spot, strike, rate, vol, time);
    let in_price = knock_in(variant, spot, strike, barrier, rate, vol, time);

    (vanilla - in_price).max(0.0)
}

/// Down-and-out call.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::barrier::{barrier_down_in_call, barrier_down_out_call};
/// use mc_models::analytical::black_scholes_call;
///
/// // In-out parity against the vanilla call (zero rebate).
/// let (s, k, h, r, v, t) = (100.0, 100.0, 80.0, 0.05, 0.2, 1.0);
/// let din = barrier_down_in_call(s, k, h, 0.0, r, v, t);
/// let dout = barrier_down_out_call(s, k, h, 0.0, r, v, t);
/// let vanilla = black_scholes_call(s, k, r, v, t);
/// assert!((din + dout - vanilla).abs() < 1e-9);
/// ```
pub fn barrier_down_out_call(
    spot: f64,
    strike: f64,
    barrier: f64,
    rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    knock_out(Variant::DownCall, spot, strike, barrier, rebate, rate, vol, time)
}

/// Down-and-in call.
pub fn barrier_down_in_call(
    spot: f64,
    strike: f64,
    barrier: f64,
    _rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    knock_in(Variant::DownCall, spot, strike, barrier, rate, vol, time)
}

/// Up-and-out call. Worthless when the barrier sits at or below the strike.
pub fn barrier_up_out_call(
    spot: f64,
    strike: f64,
    barrier: f64,
    rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    knock_out(Variant::UpCall, spot, strike, barrier, rebate, rate, vol, time)
}

/// Up-and-in call.
pub fn barrier_up_in_call(
    spot: f64,
    strike: f64,
    barrier: f64,
    _rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    knock_in(Variant::UpCall, spot, strike, barrier, rate, vol, time)
}

/// Down-and-out put.
pub fn barrier_down_out_put(
    spot: f64,
    strike: f64,
    barrier: f64,
    rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    knock_out(Variant::DownPut, spot, strike, barrier, rebate, rate, vol, time)
}

/// Down-and-in put.
pub fn barrier_down_in_put(
    spot: f64,
    strike: f64,
    barrier: f64,
    _rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    knock_in(Variant::DownPut, spot, strike, barrier, rate, vol, time)
}

/// Up-and-out put.
pub fn barrier_up_out_put(
    spot: f64,
    strike: f64,
    barrier: f64,
    rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    knock_out(Variant::UpPut, spot, strike, barrier, rebate, rate, vol, time)
}

/// Up-and-in put.
pub fn barrier_up_in_put(
    spot: f64,
    strike: f64,
    barrier: f64,
    _rebate: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> f64 {
    knock_in(Variant::UpPut, spot, strike, barrier, rate, vol, time)
}
