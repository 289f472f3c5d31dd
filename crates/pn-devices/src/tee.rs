//! Branch points: one stream into two, and two into one.

use crate::common::{EPSILON_WEIGHT, input, through};
use crate::error::ComputeResult;
use crate::traits::{ComputeContext, DeviceMath};
use pn_core::numeric::ensure_fraction;
use pn_core::{DeviceData, Real};

/// Tee dividing one inlet between two outlets.
///
/// ## Split ratio
///
/// With `p = p_in - loss` and `req_i` the pressure outlet `i`'s branch needs:
///
/// ```text
/// w_i     = max(p - req_i, 0)
/// ratio_0 = w_0 / (w_0 + w_1)
/// ```
///
/// The branch asking for less pressure draws more flow. `default_ratio` is
/// used while either requirement is unknown or both weights vanish. Outlet
/// flows are `Q * ratio_0` and `Q - Q * ratio_0`, so they always add up to
/// the inlet flow.
#[derive(Clone, Debug, PartialEq)]
pub struct TeeSplit {
    /// Share of the flow sent to outlet 0 when no demand is known
    pub default_ratio: Real,
}

impl Default for TeeSplit {
    fn default() -> Self {
        Self { default_ratio: 0.5 }
    }
}

impl TeeSplit {
    pub fn new(default_ratio: Real) -> ComputeResult<Self> {
        let default_ratio = ensure_fraction(default_ratio, "split ratio")?;
        Ok(Self { default_ratio })
    }

    /// Share of the inlet flow leaving through outlet 0.
    pub fn ratio(&self, available: Real, ctx: &ComputeContext<'_>) -> Real {
        let (Some(r0), Some(r1)) = (ctx.demand(0), ctx.demand(1)) else {
            return self.default_ratio;
        };
        let w0 = (available - r0).max(0.0);
        let w1 = (available - r1).max(0.0);
        let total = w0 + w1;
        if total > EPSILON_WEIGHT && total.is_finite() {
            w0 / total
        } else {
            self.default_ratio
        }
    }
}

impl DeviceMath for TeeSplit {
    fn inlets(&self) -> usize {
        1
    }

    fn outlets(&self) -> usize {
        2
    }

    fn compute(
        &self,
        inputs: &[DeviceData],
        pressure_loss: Real,
        ctx: &ComputeContext<'_>,
    ) -> ComputeResult<Vec<DeviceData>> {
        let inlet = input(inputs, 0)?;
        let available = inlet.pressure - pressure_loss;
        let ratio = self.ratio(available, ctx);

        let q0 = inlet.flow * ratio;
        let q1 = inlet.flow - q0;
        let base = inlet.with_pressure(available);
        Ok(vec![base.with_flow(q0), base.with_flow(q1)])
    }

    fn required_inlet(
        &self,
        outlet_demand: &[Option<Real>],
        pressure_loss: Real,
    ) -> Vec<Option<Real>> {
        // The easier branch sets what the inlet needs; unknown branches are
        // skipped so a loop back-edge does not hide the other side.
        let easiest = outlet_demand
            .iter()
            .flatten()
            .copied()
            .reduce(Real::min);
        vec![through(easiest, pressure_loss)]
    }
}

/// Tee joining two inlets into one outlet.
///
/// Output is [`DeviceData::mix`] of the inlets (flows add, temperature is
/// flow-weighted, pressure is the lower flowing one) minus the device's
/// pressure loss, which acts as the mixing loss.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TeeMerge;

impl DeviceMath for TeeMerge {
    fn inlets(&self) -> usize {
        2
    }

    fn outlets(&self) -> usize {
        1
    }

    fn compute(
        &self,
        inputs: &[DeviceData],
        pressure_loss: Real,
        _ctx: &ComputeContext<'_>,
    ) -> ComputeResult<Vec<DeviceData>> {
        let mixed = match (input(inputs, 0), input(inputs, 1)) {
            (Ok(a), Ok(b)) => DeviceData::mix(&a, &b),
            (Ok(one), Err(_)) | (Err(_), Ok(one)) => one,
            (Err(err), Err(_)) => return Err(err),
        };
        Ok(vec![mixed.with_pressure(mixed.pressure - pressure_loss)])
    }

    fn required_inlet(
        &self,
        outlet_demand: &[Option<Real>],
        pressure_loss: Real,
    ) -> Vec<Option<Real>> {
        let req = through(outlet_demand.first().copied().flatten(), pressure_loss);
        vec![req, req]
    }
}
