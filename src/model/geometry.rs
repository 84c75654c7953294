use glam::Vec3;
use std::f32::consts::TAU;

/// Indexed triangle soup in local space, shared by meshes and colliders
#[derive(Debug, Clone, Default)]
pub struct TriangleSoup {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

/// Ring in the XY plane, centred at the origin.
///
/// `radius` is the distance from the centre to the middle of the tube,
/// `radial_segments` runs around the tube and `tubular_segments` around the ring.
/// Seam vertices are duplicated so every ring closes on its own.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> TriangleSoup {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut soup = TriangleSoup::default();

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let centre = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            soup.positions.push(p);
            soup.normals.push((p - centre).normalize_or_zero());
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            soup.triangles.push([a, b, d]);
            soup.triangles.push([b, c, d]);
        }
    }
    soup
}

/// Axis-aligned box with flat-shaded faces
pub fn cuboid(half_extents: Vec3) -> TriangleSoup {
    let h = half_extents;
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::Z),
        (Vec3::Y, Vec3::Z, Vec3::NEG_X),
        (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::NEG_X),
        (Vec3::Z, Vec3::Y, Vec3::X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::NEG_X),
    ];

    let mut soup = TriangleSoup::default();
    for (normal, up, side) in faces {
        let base = soup.positions.len() as u32;
        let centre = normal * h;
        let up = up * h;
        let side = side * h;
        for corner in [-side - up, side - up, side + up, -side + up] {
            soup.positions.push(centre + corner);
            soup.normals.push(normal);
        }
        soup.triangles.push([base, base + 1, base + 2]);
        soup.triangles.push([base, base + 2, base + 3]);
    }
    soup
}

/// UV sphere with `width_segments` around and `height_segments` pole to pole
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> TriangleSoup {
    let w = width_segments.max(3);
    let hgt = height_segments.max(2);
    let mut soup = TriangleSoup::default();

    for y in 0..=hgt {
        let v = y as f32 / hgt as f32;
        let theta = v * std::f32::consts::PI;
        for x in 0..=w {
            let u = x as f32 / w as f32;
            let phi = u * TAU;
            let n = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            soup.positions.push(n * radius);
            soup.normals.push(n);
        }
    }

    let row = w + 1;
    for y in 0..hgt {
        for x in 0..w {
            let a = y * row + x + 1;
            let b = y * row + x;
            let c = (y + 1) * row + x;
            let d = (y + 1) * row + x + 1;
            if y != 0 {
                soup.triangles.push([a, b, d]);
            }
            if y != hgt - 1 {
                soup.triangles.push([b, c, d]);
            }
        }
    }
    soup
}
