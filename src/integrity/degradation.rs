//! Degradation models applied to the broadcast corrections
use crate::{
    cfg::NavigationMode,
    integrity::Timeout,
    message::DegradationParameters,
};

/// Fast correction degradation factor table (MT7):
/// (aᵢ in m/s², I_fc in NPA (s), I_fc in PA (s)), indexed by aᵢ indicator
const FAST_DEGRADATION_FACTORS: [(f64, u32, u32); 16] = [
    (0.0, 180, 120),
    (0.00005, 180, 120),
    (0.00009, 153, 102),
    (0.00012, 135, 90),
    (0.00015, 135, 90),
    (0.00020, 117, 78),
    (0.00030, 99, 66),
    (0.00045, 81, 54),
    (0.00060, 63, 42),
    (0.00090, 45, 30),
    (0.00150, 45, 30),
    (0.00210, 27, 18),
    (0.00270, 27, 18),
    (0.00330, 27, 18),
    (0.00460, 18, 12),
    (0.00580, 18, 12),
];

/// Indicator used when the degradation factor of a satellite is unknown:
/// the most stringent one.
pub const DEFAULT_DEGRADATION_INDICATOR: u8 = 15;

/// Fast correction degradation factor of one satellite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegradationFactor {
    /// aᵢ (m/s²)
    pub ai_m_s2: f64,
    /// Fast correction time out in NPA (s)
    pub npa_timeout_s: u32,
    /// Fast correction time out in PA (s)
    pub pa_timeout_s: u32,
}

impl Default for DegradationFactor {
    fn default() -> Self {
        Self::from_indicator(DEFAULT_DEGRADATION_INDICATOR)
    }
}

impl DegradationFactor {
    /// Builds [DegradationFactor] from its 4 bit indicator
    pub fn from_indicator(indicator: u8) -> Self {
        let (ai_m_s2, npa_timeout_s, pa_timeout_s) =
            FAST_DEGRADATION_FACTORS[(indicator as usize).min(15)];
        Self {
            ai_m_s2,
            npa_timeout_s,
            pa_timeout_s,
        }
    }

    /// Fast correction [Timeout] (I_fc) in given mode
    pub fn timeout(&self, mode: NavigationMode) -> Timeout {
        match mode {
            NavigationMode::PrecisionApproach => Timeout::Seconds(self.pa_timeout_s),
            NavigationMode::NonPrecisionApproach => Timeout::Seconds(self.npa_timeout_s),
        }
    }

    /// I_fc (s) in given mode
    pub fn timeout_s(&self, mode: NavigationMode) -> f64 {
        match mode {
            NavigationMode::PrecisionApproach => self.pa_timeout_s as f64,
            NavigationMode::NonPrecisionApproach => self.npa_timeout_s as f64,
        }
    }

    /// ε_fc (m), `elapsed_s` after the fast correction time of applicability
    pub fn eps_fc(&self, elapsed_s: f64, latency_s: f64) -> f64 {
        self.ai_m_s2 * (elapsed_s + latency_s).powi(2) / 2.0
    }
}

/// Pair of fast corrections the range rate correction was derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRateBasis {
    /// IODF of the current fast correction
    pub iodf: u8,
    /// IODF of the previous fast correction
    pub previous_iodf: u8,
    /// Time between both corrections (s)
    pub dt_s: f64,
}

impl DegradationParameters {
    /// ε_rrc (m), `elapsed_s` after the fast correction time of applicability
    pub fn eps_rrc(
        &self,
        basis: Option<RangeRateBasis>,
        factor: &DegradationFactor,
        mode: NavigationMode,
        elapsed_s: f64,
    ) -> f64 {
        let Some(basis) = basis else {
            return 0.0;
        };

        if basis.dt_s <= 0.0 {
            return 0.0;
        }

        let i_fc = factor.timeout_s(mode);
        let b_term = self.b_rrc_m / basis.dt_s;

        if basis.iodf != 3 && basis.previous_iodf != 3 {
            if (basis.iodf + 3 - basis.previous_iodf) % 3 == 1 {
                0.0
            } else {
                (factor.ai_m_s2 * i_fc / 4.0 + b_term) * elapsed_s
            }
        } else {
            let offset = (basis.dt_s - i_fc / 2.0).abs();
            if offset == 0.0 {
                0.0
            } else {
                (factor.ai_m_s2 * offset / 2.0 + b_term) * elapsed_s
            }
        }
    }

    /// ε_ltc (m) for velocity code 1, `dt_s = t - t0`
    pub fn eps_ltc_v1(&self, dt_s: f64) -> f64 {
        if dt_s > 0.0 && dt_s < self.i_ltc_v1_s {
            0.0
        } else {
            let excess = (-dt_s).max(dt_s - self.i_ltc_v1_s).max(0.0);
            self.c_ltc_lsb_m + self.c_ltc_v1_m_s * excess
        }
    }

    /// ε_ltc (m) for velocity code 0, `elapsed_s` after reception
    pub fn eps_ltc_v0(&self, elapsed_s: f64) -> f64 {
        if self.i_ltc_v0_s <= 0.0 {
            return 0.0;
        }
        self.c_ltc_v0_m * (elapsed_s / self.i_ltc_v0_s).floor()
    }

    /// ε_iono (m), `elapsed_s` after the IGP delay reception
    pub fn eps_iono(&self, elapsed_s: f64) -> f64 {
        let step = if self.i_iono_s > 0.0 {
            self.c_iono_step_m * (elapsed_s / self.i_iono_s).floor()
        } else {
            0.0
        };
        step + self.c_iono_ramp_m_s * elapsed_s
    }
}

/// Terms of the fast and long-term correction residual error model
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FltBudget {
    /// σ(UDRE) (m)
    pub sigma_udre_m: f64,
    /// δUDRE factor (MT27 or MT28)
    pub delta_udre: f64,
    pub eps_fc_m: f64,
    pub eps_rrc_m: f64,
    pub eps_ltc_m: f64,
    /// En route degradation
    pub eps_er_m: f64,
}

impl FltBudget {
    /// σ²(flt) in m²
    pub fn variance_m2(&self, rss_udre: bool) -> f64 {
        let udre = self.sigma_udre_m * self.delta_udre;
        if rss_udre {
            udre.powi(2)
                + self.eps_fc_m.powi(2)
                + self.eps_rrc_m.powi(2)
                + self.eps_ltc_m.powi(2)
                + self.eps_er_m.powi(2)
        } else {
            (udre + self.eps_fc_m + self.eps_rrc_m + self.eps_ltc_m + self.eps_er_m).powi(2)
        }
    }
}
