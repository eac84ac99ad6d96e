//! Rounded-rectangle outline used as the extrusion profile of the glass mesh.
//!
//! Corners are produced by applying the four diagonal sign matrices
//! `diag(±1, ±1)` to the half-extent vector. Whether a corner sits in an odd or
//! even quadrant (the sign of the matrix determinant) picks which edge-offset
//! template it uses, so consecutive corners always join along the shared edge.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCmd {
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    QuadTo([f32; 2], [f32; 2]),
    Close,
}

/// Closed outline, centered on the rectangle centroid.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryPath {
    pub cmds: Vec<PathCmd>,
}

/// 2x2 diagonal matrix, the only kind the corner construction needs.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Diag2 {
    sx: f32,
    sy: f32,
}

impl Diag2 {
    const fn new(sx: f32, sy: f32) -> Self {
        Self { sx, sy }
    }

    fn det(self) -> f32 {
        self.sx * self.sy
    }

    fn apply(self, v: [f32; 2]) -> [f32; 2] {
        [self.sx * v[0], self.sy * v[1]]
    }
}

// Unit square vertices, in traversal order.
const CORNERS: [Diag2; 4] = [
    Diag2::new(1.0, 1.0),
    Diag2::new(1.0, -1.0),
    Diag2::new(-1.0, -1.0),
    Diag2::new(-1.0, 1.0),
];

// (incoming edge end, outgoing edge start) offsets for concordant / discordant corners.
const OFFSET_TEMPLATES: [[[f32; 2]; 2]; 2] = [[[1.0, 0.0], [0.0, 1.0]], [[0.0, 1.0], [1.0, 0.0]]];

#[derive(Clone, Copy, Debug)]
struct Corner {
    edge_end: [f32; 2],
    ctrl: [f32; 2],
    edge_start: [f32; 2],
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn sub_scaled(v: [f32; 2], off: [f32; 2], r: f32) -> [f32; 2] {
    [v[0] - off[0] * r, v[1] - off[1] * r]
}

/// Build the closed outline of a `width` x `height` rectangle with corner `radius`.
///
/// The radius is clamped to half the smaller side. Non-finite or negative inputs
/// are treated as zero, so the result never contains NaN.
pub fn rounded_rect_path(width: f32, height: f32, radius: f32) -> GeometryPath {
    let hw = sanitize(width) / 2.0;
    let hh = sanitize(height) / 2.0;
    let r = sanitize(radius).min(hw).min(hh);
    let vert = [hw, hh];

    let corners = CORNERS.map(|m| {
        let concordant = m.det() > 0.0;
        let [off_end, off_new] = OFFSET_TEMPLATES[if concordant { 0 } else { 1 }];
        Corner {
            edge_end: m.apply(sub_scaled(vert, off_end, r)),
            ctrl: m.apply(vert),
            edge_start: m.apply(sub_scaled(vert, off_new, r)),
        }
    });

    let mut cmds = Vec::with_capacity(10);
    cmds.push(PathCmd::MoveTo(corners[3].edge_start));
    for c in &corners {
        cmds.push(PathCmd::LineTo(c.edge_end));
        cmds.push(PathCmd::QuadTo(c.ctrl, c.edge_start));
    }
    cmds.push(PathCmd::Close);
    GeometryPath { cmds }
}

impl GeometryPath {
    pub fn line_count(&self) -> usize {
        self.cmds.iter().filter(|c| matches!(c, PathCmd::LineTo(_))).count()
    }

    pub fn quad_count(&self) -> usize {
        self.cmds.iter().filter(|c| matches!(c, PathCmd::QuadTo(..))).count()
    }

    pub fn first_point(&self) -> Option<[f32; 2]> {
        self.cmds.iter().find_map(|c| match c {
            PathCmd::MoveTo(p) => Some(*p),
            _ => None,
        })
    }

    /// End point of the last drawing command.
    pub fn last_point(&self) -> Option<[f32; 2]> {
        self.cmds.iter().rev().find_map(|c| match c {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) | PathCmd::QuadTo(_, p) => Some(*p),
            PathCmd::Close => None,
        })
    }

    /// Explicitly closed and the pen ends where it started.
    pub fn is_closed(&self) -> bool {
        matches!(self.cmds.last(), Some(PathCmd::Close))
            && self.first_point().is_some()
            && self.first_point() == self.last_point()
    }

    /// Every coordinate in the path, control points included.
    pub fn points(&self) -> impl Iterator<Item = [f32; 2]> + '_ {
        self.cmds.iter().flat_map(|c| match *c {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => vec![p],
            PathCmd::QuadTo(c, p) => vec![c, p],
            PathCmd::Close => Vec::new(),
        })
    }

    /// Convert to a lyon path for tessellation.
    pub fn to_lyon(&self) -> lyon_path::Path {
        use lyon_geom::point;

        let mut builder = lyon_path::Path::builder();
        let mut started = false;
        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    if started {
                        builder.end(false);
                    }
                    builder.begin(point(p[0], p[1]));
                    started = true;
                }
                PathCmd::LineTo(p) => {
                    if started {
                        builder.line_to(point(p[0], p[1]));
                    } else {
                        builder.begin(point(p[0], p[1]));
                        started = true;
                    }
                }
                PathCmd::QuadTo(c, p) => {
                    builder.quadratic_bezier_to(point(c[0], c[1]), point(p[0], p[1]));
                }
                PathCmd::Close => {
                    builder.end(true);
                    started = false;
                }
            }
        }
        if started {
            builder.end(false);
        }
        builder.build()
    }
}
