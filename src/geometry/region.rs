use crate::{
    error::Unavailable,
    iono::{interpolation_weights, Corner, InterpolationMode},
    message::{RegionShape, ServiceRegion},
};

/// Location of a point with respect to a [ServiceRegion]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMembership {
    Inside,
    Outside,
}

impl ServiceRegion {
    /// Locates this point with respect to this region.
    /// Regions spanning less than 1° in either direction are degenerate.
    pub fn membership(&self, lat_deg: f64, lon_deg: f64) -> Result<RegionMembership, Unavailable> {
        let (mut lon1, mut lon2, mut lon) = (self.lon1_deg, self.lon2_deg, lon_deg);

        // antimeridian crossing: work in [0, 360[
        if (lon2 - lon1).abs() > 180.0 {
            let shift = |l: f64| if l < 0.0 { l + 360.0 } else { l };
            lon1 = shift(lon1);
            lon2 = shift(lon2);
            lon = shift(lon);
        }

        let (lat1, lat2) = (self.lat1_deg, self.lat2_deg);

        if (lat2 - lat1).abs() < 1.0 || (lon2 - lon1).abs() < 1.0 {
            return Err(Unavailable::Degenerate);
        }

        let (south, north) = (lat1.min(lat2), lat1.max(lat2));
        let (west, east) = (lon1.min(lon2), lon1.max(lon2));

        let x = (lon - west) / (east - west);
        let y = (lat_deg - south) / (north - south);

        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Ok(RegionMembership::Outside);
        }

        match self.shape {
            RegionShape::Quadrangle => Ok(RegionMembership::Inside),
            RegionShape::Triangle => {
                // (lat2, lon1) is not part of the triangle
                let excluded = match (lat2 > lat1, lon1 < lon2) {
                    (true, true) => Corner::NorthWest,
                    (true, false) => Corner::NorthEast,
                    (false, true) => Corner::SouthWest,
                    (false, false) => Corner::SouthEast,
                };

                match interpolation_weights(InterpolationMode::Triangle(excluded), x, y) {
                    Ok(_) => Ok(RegionMembership::Inside),
                    Err(_) => Ok(RegionMembership::Outside),
                }
            },
        }
    }

    /// True if this point lies within this (non degenerate) region
    pub fn contains(&self, lat_deg: f64, lon_deg: f64) -> bool {
        matches!(
            self.membership(lat_deg, lon_deg),
            Ok(RegionMembership::Inside)
        )
    }
}
