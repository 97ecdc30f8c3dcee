//! Metrics endpoint (§6), grounded in `server/metrics_handler.py`: moment-
//! of-inertia-style dispersion, space/weight utilization, a composite
//! stability score, and packed volume, recomputed directly from a set of
//! placed cuboids inside one ULD.

use crate::dto::{MetricsPackageDto, MetricsRequestBody, MetricsResponseDto};

struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    fn add(&self, other: &Vector3) -> Vector3 {
        Vector3 { x: self.x + other.x, y: self.y + other.y, z: self.z + other.z }
    }

    fn scale(&self, scalar: f64) -> Vector3 {
        Vector3 { x: self.x * scalar, y: self.y * scalar, z: self.z * scalar }
    }

    fn distance_z(&self, other: &Vector3) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    fn distance_2d(&self, x: f64, y: f64) -> f64 {
        (self.x - x).powi(2) + (self.y - y).powi(2)
    }
}

impl MetricsPackageDto {
    fn length(&self) -> f64 {
        self.x2 - self.x1
    }

    fn width(&self) -> f64 {
        self.y2 - self.y1
    }

    fn height(&self) -> f64 {
        self.z2 - self.z1
    }

    fn center(&self) -> Vector3 {
        Vector3 {
            x: (self.x2 + self.x1) / 2.0,
            y: (self.y2 + self.y1) / 2.0,
            z: (self.z2 + self.z1) / 2.0,
        }
    }

    fn volume(&self) -> f64 {
        self.length() * self.width() * self.height()
    }
}

fn volumetric_center(packages: &[MetricsPackageDto]) -> Vector3 {
    let mut total_volume = 0.0;
    let mut center = Vector3 { x: 0.0, y: 0.0, z: 0.0 };
    for pkg in packages {
        let v = pkg.volume();
        total_volume += v;
        center = center.add(&pkg.center().scale(v));
    }
    if total_volume == 0.0 {
        return center;
    }
    center.scale(1.0 / total_volume)
}

fn moi(req: &MetricsRequestBody) -> f64 {
    let center = volumetric_center(&req.packages);
    let corners = [(0.0, 0.0), (req.uld_length, 0.0), (0.0, req.uld_width), (req.uld_length, req.uld_width)];

    let mut moi_min = 0.0;
    let mut moi_corners = [0.0_f64; 4];
    for pkg in &req.packages {
        moi_min += pkg.weight * pkg.center().distance_z(&center);
        for (i, &(cx, cy)) in corners.iter().enumerate() {
            moi_corners[i] += pkg.weight * pkg.center().distance_2d(cx, cy);
        }
    }
    if moi_min == 0.0 {
        return 0.0;
    }

    let mean = moi_corners.iter().sum::<f64>() / moi_corners.len() as f64;
    let variance = moi_corners.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / moi_corners.len() as f64;
    (mean + variance.sqrt()) / moi_min
}

fn pack_volume(req: &MetricsRequestBody) -> f64 {
    req.packages.iter().map(|p| p.volume()).sum()
}

fn utilization(req: &MetricsRequestBody) -> f64 {
    if req.uld_length == 0.0 || req.uld_width == 0.0 || req.uld_height == 0.0 {
        return 0.0;
    }
    pack_volume(req) / (req.uld_length * req.uld_width * req.uld_height)
}

fn weight_utilization(req: &MetricsRequestBody) -> f64 {
    if req.uld_weight == 0.0 {
        return 0.0;
    }
    req.packages.iter().map(|p| p.weight).sum::<f64>() / req.uld_weight
}

fn stability(req: &MetricsRequestBody) -> f64 {
    let packages = &req.packages;
    if packages.is_empty() {
        return 0.0;
    }

    let total_weight: f64 = packages.iter().map(|p| p.weight).sum();
    let mut base_support_area = 0.0;
    let mut center_of_gravity_height = 0.0;
    let mut weighted_x_sum = 0.0;
    let mut weighted_y_sum = 0.0;

    for pkg in packages {
        let max_base_area =
            (pkg.length() * pkg.width()).max(pkg.length() * pkg.height()).max(pkg.width() * pkg.height());
        base_support_area += pkg.length() * pkg.width() / max_base_area;
        center_of_gravity_height += (pkg.z1 + pkg.z2) / 2.0 / req.uld_height * (pkg.weight / total_weight);
        let center = pkg.center();
        weighted_x_sum += center.x * pkg.weight;
        weighted_y_sum += center.y * pkg.weight;
    }

    let mut stacking_stability = 0.0;
    for pkg in packages {
        let stacked_weight: f64 = packages
            .iter()
            .filter(|other| {
                other.x1 < pkg.x2 && other.x2 > pkg.x1 && other.y1 < pkg.y2 && other.y2 > pkg.y1 && other.z2 <= pkg.z1
            })
            .map(|other| other.weight)
            .sum();
        if stacked_weight >= pkg.weight {
            stacking_stability += 1.0;
        }
    }

    base_support_area /= packages.len() as f64;
    stacking_stability /= packages.len() as f64;

    let center_x = weighted_x_sum / total_weight;
    let center_y = weighted_y_sum / total_weight;
    let deviation_from_center =
        ((center_x - req.uld_length / 2.0).powi(2) + (center_y - req.uld_width / 2.0).powi(2)).sqrt();
    let placement_distribution = 1.0 - deviation_from_center / ((req.uld_length + req.uld_width) / 4.0);

    0.2 * base_support_area
        + 0.2 * (1.0 - center_of_gravity_height)
        + 0.5 * placement_distribution
        + 0.1 * stacking_stability
        + 0.08
}

pub fn compute(req: &MetricsRequestBody) -> MetricsResponseDto {
    MetricsResponseDto {
        moi: moi(req),
        count: req.packages.len(),
        utilization: utilization(req),
        weight_utilization: weight_utilization(req),
        stability: stability(req),
        pack_volume: pack_volume(req),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64, weight: f64) -> MetricsPackageDto {
        MetricsPackageDto { x1, y1, z1, x2, y2, z2, weight }
    }

    #[test]
    fn empty_packages_yield_zero_metrics() {
        let req = MetricsRequestBody { uld_length: 10.0, uld_width: 10.0, uld_height: 10.0, uld_weight: 100.0, packages: vec![] };
        let metrics = compute(&req);
        assert_eq!(metrics.count, 0);
        assert_eq!(metrics.moi, 0.0);
        assert_eq!(metrics.utilization, 0.0);
        assert_eq!(metrics.stability, 0.0);
    }

    #[test]
    fn single_centered_package_has_full_utilization() {
        let req = MetricsRequestBody {
            uld_length: 10.0,
            uld_width: 10.0,
            uld_height: 10.0,
            uld_weight: 50.0,
            packages: vec![pkg(0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 50.0)],
        };
        let metrics = compute(&req);
        assert_eq!(metrics.pack_volume, 1000.0);
        assert_eq!(metrics.utilization, 1.0);
        assert_eq!(metrics.weight_utilization, 1.0);
    }
}
