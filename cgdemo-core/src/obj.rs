//! Wavefront OBJ loading.
//!
//! Only the subset of the format used by the demos is understood: `v` positions, `vt`
//! texture coordinates and triangular `f` records of the form `p/t/n`. Every other record
//! (comments, `vn`, groups, materials, ...) is skipped. Normals are never read from the
//! file, they are recomputed from the triangle geometry.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use glam::{Vec2, Vec3, Vec4};

/// Errors produced while loading an OBJ file.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("failed to open OBJ file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("malformed {record} record on line {line}: {reason}")]
    Malformed {
        line: usize,
        record: &'static str,
        reason: String,
    },
    #[error("line {line} references {kind} {index}, but only {count} are defined")]
    IndexOutOfBounds {
        line: usize,
        kind: &'static str,
        /// The 1-based index as written in the file.
        index: usize,
        count: usize,
    },
}

impl ObjError {
    /// Returns `true` if the file could not be opened because it does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ObjError::Open { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// How per-vertex normals are derived from the triangles that share a vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalMode {
    /// Every triangle writes its face normal to its three corners, so the last triangle
    /// touching a shared vertex decides its normal.
    #[default]
    Overwrite,
    /// Face normals are summed per vertex and the sum is normalized.
    Smooth,
}

/// A triangle mesh loaded from an OBJ file.
///
/// `normals` is parallel to `positions`. `tex_coords` holds one entry per triangle
/// corner and is parallel to `indices`, because OBJ indexes positions and texture
/// coordinates independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    pub positions: Vec<Vec4>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

/// One expanded triangle corner, laid out for direct upload to a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct ObjVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl ObjMesh {
    /// Returns the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recomputes `normals` from the triangle geometry.
    ///
    /// The face normal of a triangle `(a, b, c)` is `normalize((b - a) x (c - a))`.
    /// Degenerate triangles contribute a zero vector.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range of `positions`. Meshes returned by
    /// [`parse_obj`] are always in range.
    pub fn compute_normals(&mut self, mode: NormalMode) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for triangle in self.indices.chunks_exact(3) {
            let (ia, ib, ic) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            let a = self.positions[ia].truncate();
            let b = self.positions[ib].truncate();
            let c = self.positions[ic].truncate();
            let face = (b - a).cross(c - a);

            match mode {
                NormalMode::Overwrite => {
                    let normal = face.normalize_or_zero();
                    self.normals[ia] = normal;
                    self.normals[ib] = normal;
                    self.normals[ic] = normal;
                }
                NormalMode::Smooth => {
                    self.normals[ia] += face;
                    self.normals[ib] += face;
                    self.normals[ic] += face;
                }
            }
        }

        if mode == NormalMode::Smooth {
            for normal in &mut self.normals {
                *normal = normal.normalize_or_zero();
            }
        }
    }

    /// Expands the mesh into one vertex per triangle corner.
    ///
    /// Returns the vertices and a sequential index list. Each corner keeps its own texture
    /// coordinate, which an indexed draw over `positions` cannot express.
    pub fn to_vertices(&self) -> (Vec<ObjVertex>, Vec<u32>) {
        let vertices: Vec<ObjVertex> = self
            .indices
            .iter()
            .zip(&self.tex_coords)
            .map(|(&index, &uv)| {
                let index = index as usize;
                ObjVertex {
                    position: self.positions[index].truncate(),
                    normal: self.normals.get(index).copied().unwrap_or(Vec3::ZERO),
                    uv,
                }
            })
            .collect();
        let indices = (0..vertices.len() as u32).collect();
        (vertices, indices)
    }
}

impl std::str::FromStr for ObjMesh {
    type Err = ObjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_obj(s.as_bytes())
    }
}

/// Loads an OBJ mesh from a file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ObjMesh, ObjError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(BufReader::new(file))?;
    log::info!(
        "Loaded {} ({} vertices, {} triangles)",
        path.display(),
        mesh.positions.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parses an OBJ mesh from any buffered reader and computes its normals with
/// [`NormalMode::Overwrite`].
pub fn parse_obj<R: BufRead>(reader: R) -> Result<ObjMesh, ObjError> {
    let mut mesh = ObjMesh::default();
    let mut uvs: Vec<Vec2> = Vec::new();
    // Source line of every face, for reporting position indices checked after the scan.
    let mut face_lines: Vec<usize> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|source| ObjError::Read {
            line: line_no,
            source,
        })?;
        let line = line.trim_start();

        if let Some(rest) = line.strip_prefix("v ") {
            let [x, y, z] = parse_floats::<3>(rest, line_no, "vertex")?;
            mesh.positions.push(Vec4::new(x, y, z, 1.0));
        } else if let Some(rest) = line.strip_prefix("vt ") {
            let [u, v] = parse_floats::<2>(rest, line_no, "texture coordinate")?;
            uvs.push(Vec2::new(u, v));
        } else if let Some(rest) = line.strip_prefix("f ") {
            for (position, uv) in parse_face(rest, line_no)? {
                let tex_coord = uvs
                    .get(uv)
                    .copied()
                    .ok_or(ObjError::IndexOutOfBounds {
                        line: line_no,
                        kind: "texture coordinate",
                        index: uv + 1,
                        count: uvs.len(),
                    })?;
                mesh.indices.push(position);
                mesh.tex_coords.push(tex_coord);
            }
            face_lines.push(line_no);
        }
    }

    // Faces may reference positions declared further down the file.
    for (triangle, &line) in mesh.indices.chunks_exact(3).zip(&face_lines) {
        for &index in triangle {
            if index as usize >= mesh.positions.len() {
                return Err(ObjError::IndexOutOfBounds {
                    line,
                    kind: "vertex",
                    index: index as usize + 1,
                    count: mesh.positions.len(),
                });
            }
        }
    }

    mesh.compute_normals(NormalMode::Overwrite);
    log::debug!(
        "Parsed OBJ: {} positions, {} texture coordinates, {} triangles",
        mesh.positions.len(),
        uvs.len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

fn malformed(line: usize, record: &'static str, reason: impl Into<String>) -> ObjError {
    ObjError::Malformed {
        line,
        record,
        reason: reason.into(),
    }
}

/// Parses the first `N` whitespace separated numbers of a record, ignoring the rest.
fn parse_floats<const N: usize>(
    rest: &str,
    line: usize,
    record: &'static str,
) -> Result<[f32; N], ObjError> {
    let mut values = [0.0; N];
    let mut parts = rest.split_whitespace();
    for value in values.iter_mut() {
        let token = parts
            .next()
            .ok_or_else(|| malformed(line, record, format!("expected {N} components")))?;
        *value = token
            .parse()
            .map_err(|_| malformed(line, record, format!("'{token}' is not a number")))?;
    }
    Ok(values)
}

/// Parses the first three `p/t/n` corners of a face into 0-based position and texture
/// coordinate indices. Any further corners are ignored.
fn parse_face(rest: &str, line: usize) -> Result<[(u32, usize); 3], ObjError> {
    let mut corners = [(0, 0); 3];
    let mut parts = rest.split_whitespace();
    for corner in corners.iter_mut() {
        let token = parts
            .next()
            .ok_or_else(|| malformed(line, "face", "expected three corners"))?;
        let mut fields = token.split('/');
        let position = parse_index(fields.next(), line, token)?;
        let uv = parse_index(fields.next(), line, token)?;
        let position = u32::try_from(position)
            .map_err(|_| malformed(line, "face", format!("index in '{token}' is too large")))?;
        *corner = (position, uv);
    }
    Ok(corners)
}

fn parse_index(field: Option<&str>, line: usize, token: &str) -> Result<usize, ObjError> {
    let raw: usize = field
        .filter(|f| !f.is_empty())
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| {
            malformed(
                line,
                "face",
                format!("'{token}' needs positive position and texture coordinate indices"),
            )
        })?;
    raw.checked_sub(1)
        .ok_or_else(|| malformed(line, "face", format!("'{token}' uses index 0, indices are 1-based")))
}
