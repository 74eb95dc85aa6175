//! Inverse map projections (projected metres to geographic degrees).
//!
//! Formulas follow Snyder, "Map Projections: A Working Manual" (USGS PP 1395).
//! NAD83 and WGS84 are treated as coincident, so no datum shift is applied.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Semi-major axis shared by GRS80 and WGS84
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

const MAX_ITERATIONS: usize = 15;
const CONVERGENCE: f64 = 1e-12;

/// One US survey foot in metres
pub const US_SURVEY_FOOT: f64 = 1200.0 / 3937.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub a: f64,
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: SEMI_MAJOR_AXIS,
        inverse_flattening: 298.257_223_563,
    };

    pub const GRS80: Ellipsoid = Ellipsoid {
        a: SEMI_MAJOR_AXIS,
        inverse_flattening: 298.257_222_101,
    };

    /// First eccentricity squared
    pub fn es(&self) -> f64 {
        let f = 1.0 / self.inverse_flattening;
        f * (2.0 - f)
    }

    pub fn e(&self) -> f64 {
        self.es().sqrt()
    }

    fn m(&self, phi: f64) -> f64 {
        let s = phi.sin();
        phi.cos() / (1.0 - self.es() * s * s).sqrt()
    }

    fn q(&self, phi: f64) -> f64 {
        let es = self.es();
        let e = self.e();
        let s = phi.sin();
        (1.0 - es) * (s / (1.0 - es * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
    }

    fn t(&self, phi: f64) -> f64 {
        let e = self.e();
        let s = phi.sin();
        (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - e * s) / (1.0 + e * s)).powf(e / 2.0)
    }
}

/// Spherical ("pseudo") Mercator used by web maps, EPSG:3857
pub fn web_mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = x / SEMI_MAJOR_AXIS;
    let lat = (y / SEMI_MAJOR_AXIS).sinh().atan();
    (lon.to_degrees(), lat.to_degrees())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    pub central_meridian: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl TransverseMercator {
    pub fn utm(zone: u8, north: bool, ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            central_meridian: f64::from(zone) * 6.0 - 183.0,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: if north { 0.0 } else { 10_000_000.0 },
        }
    }

    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let es = self.ellipsoid.es();
        let ep2 = es / (1.0 - es);
        let k0 = self.scale_factor;
        let x = x - self.false_easting;
        let y = y - self.false_northing;

        let mu = y / k0 / (a * (1.0 - es / 4.0 - 3.0 * es.powi(2) / 64.0 - 5.0 * es.powi(3) / 256.0));
        let e1 = (1.0 - (1.0 - es).sqrt()) / (1.0 + (1.0 - es).sqrt());
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin1, cos1) = phi1.sin_cos();
        let tan1 = phi1.tan();
        let c1 = ep2 * cos1 * cos1;
        let t1 = tan1 * tan1;
        let n1 = a / (1.0 - es * sin1 * sin1).sqrt();
        let r1 = a * (1.0 - es) / (1.0 - es * sin1 * sin1).powf(1.5);
        let d = x / (n1 * k0);

        let lat = phi1
            - (n1 * tan1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);
        let lon = self.central_meridian.to_radians()
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / cos1;

        (lon.to_degrees(), lat.to_degrees())
    }
}

/// Albers equal-area conic on an ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlbersEqualArea {
    ellipsoid: Ellipsoid,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
    n: f64,
    c: f64,
    rho0: f64,
}

impl AlbersEqualArea {
    /// Angles in degrees
    pub fn new(
        ellipsoid: Ellipsoid,
        origin_lat: f64,
        central_meridian: f64,
        parallel_1: f64,
        parallel_2: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let (p0, p1, p2) = (
            origin_lat.to_radians(),
            parallel_1.to_radians(),
            parallel_2.to_radians(),
        );
        let (m1, m2) = (ellipsoid.m(p1), ellipsoid.m(p2));
        let (q0, q1, q2) = (ellipsoid.q(p0), ellipsoid.q(p1), ellipsoid.q(p2));
        let n = (m1 * m1 - m2 * m2) / (q2 - q1);
        let c = m1 * m1 + n * q1;
        let rho0 = ellipsoid.a * (c - n * q0).sqrt() / n;
        Self {
            ellipsoid,
            central_meridian,
            false_easting,
            false_northing,
            n,
            c,
            rho0,
        }
    }

    /// NAD83 / California Albers, EPSG:3310
    pub fn california() -> Self {
        Self::new(Ellipsoid::GRS80, 0.0, -120.0, 34.0, 40.5, 0.0, -4_000_000.0)
    }

    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let es = self.ellipsoid.es();
        let e = self.ellipsoid.e();
        let x = x - self.false_easting;
        let y = self.rho0 - (y - self.false_northing);

        let rho = x.hypot(y);
        let theta = x.atan2(y);
        let q = (self.c - (rho * self.n / a).powi(2)) / self.n;

        let mut phi = (q / 2.0).asin();
        for _ in 0..MAX_ITERATIONS {
            let s = phi.sin();
            let one_minus = 1.0 - es * s * s;
            let delta = one_minus * one_minus / (2.0 * phi.cos())
                * (q / (1.0 - es) - s / one_minus
                    + (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln());
            phi += delta;
            if delta.abs() < CONVERGENCE {
                break;
            }
        }

        let lon = self.central_meridian.to_radians() + theta / self.n;
        (lon.to_degrees(), phi.to_degrees())
    }
}

/// Lambert conformal conic with two standard parallels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformalConic {
    ellipsoid: Ellipsoid,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
    n: f64,
    f: f64,
    rho0: f64,
}

impl LambertConformalConic {
    /// Angles in degrees, false origin in metres
    pub fn new(
        ellipsoid: Ellipsoid,
        origin_lat: f64,
        central_meridian: f64,
        parallel_1: f64,
        parallel_2: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let (p0, p1, p2) = (
            origin_lat.to_radians(),
            parallel_1.to_radians(),
            parallel_2.to_radians(),
        );
        let (m1, m2) = (ellipsoid.m(p1), ellipsoid.m(p2));
        let (t0, t1, t2) = (ellipsoid.t(p0), ellipsoid.t(p1), ellipsoid.t(p2));
        let n = (m1.ln() - m2.ln()) / (t1.ln() - t2.ln());
        let f = m1 / (n * t1.powf(n));
        let rho0 = ellipsoid.a * f * t0.powf(n);
        Self {
            ellipsoid,
            central_meridian,
            false_easting,
            false_northing,
            n,
            f,
            rho0,
        }
    }

    /// NAD83 / California zone III (metres), EPSG:26943
    pub fn california_zone_3() -> Self {
        Self::new(
            Ellipsoid::GRS80,
            36.5,
            -120.5,
            38.0 + 26.0 / 60.0,
            37.0 + 4.0 / 60.0,
            2_000_000.0,
            500_000.0,
        )
    }

    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let e = self.ellipsoid.e();
        let x = x - self.false_easting;
        let y = self.rho0 - (y - self.false_northing);

        let rho = x.hypot(y).copysign(self.n);
        let theta = x.atan2(y);
        let t = (rho / (self.ellipsoid.a * self.f)).powf(1.0 / self.n);

        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..MAX_ITERATIONS {
            let s = phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - e * s) / (1.0 + e * s)).powf(e / 2.0)).atan();
            let done = (next - phi).abs() < CONVERGENCE;
            phi = next;
            if done {
                break;
            }
        }

        let lon = theta / self.n + self.central_meridian.to_radians();
        (lon.to_degrees(), phi.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < TOLERANCE && (actual.1 - expected.1).abs() < TOLERANCE,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_web_mercator_origin_and_city_hall() {
        assert_close(web_mercator_inverse(0.0, 0.0), (0.0, 0.0));
        assert_close(
            web_mercator_inverse(-13_627_665.271_218_073, 4_547_675.354_340_557),
            (-122.4194, 37.7749),
        );
    }

    #[test]
    fn test_utm_zone_10_north() {
        let utm = TransverseMercator::utm(10, true, Ellipsoid::WGS84);
        assert_eq!(utm.central_meridian, -123.0);
        assert_close(
            utm.inverse(551_130.768_481_283_9, 4_180_998.881_602_457_7),
            (-122.4194, 37.7749),
        );
        assert_close(utm.inverse(500_000.0, 0.0), (-123.0, 0.0));
    }

    #[test]
    fn test_california_albers() {
        let albers = AlbersEqualArea::california();
        assert_close(
            albers.inverse(-212_792.008_100_258_13, -24_127.707_277_170_382),
            (-122.4194, 37.7749),
        );
        assert_close(
            albers.inverse(162_138.862_195_271_33, -438_874.828_577_66),
            (-118.2437, 34.0522),
        );
    }

    #[test]
    fn test_california_zone_3() {
        let lcc = LambertConformalConic::california_zone_3();
        assert_close(
            lcc.inverse(1_830_924.185_348_719, 643_223.524_855_690_1),
            (-122.4194, 37.7749),
        );
        assert_close(lcc.inverse(2_000_000.0, 500_000.0), (-120.5, 36.5));
    }
}
