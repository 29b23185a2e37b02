//! Wavefront OBJ export of a collected mesh.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use nebula_roam::MeshBuffer;
use tracing::info;

use crate::AppError;

/// Write `mesh` as OBJ: one `v` and one `vn` per vertex, one `f` per
/// triangle. Vertices are not deduplicated, so face `i` uses indices
/// `3i + 1 ..= 3i + 3`.
pub fn write_obj<W: Write>(mut out: W, mesh: &MeshBuffer) -> io::Result<()> {
    writeln!(out, "# nebula-roam terrain mesh")?;
    writeln!(out, "# {} triangles", mesh.triangle_count())?;
    writeln!(out, "o terrain")?;

    for v in mesh.vertices() {
        let [x, y, z] = v.position;
        writeln!(out, "v {x} {y} {z}")?;
    }
    for v in mesh.vertices() {
        let [x, y, z] = v.normal;
        writeln!(out, "vn {x} {y} {z}")?;
    }
    for tri in 0..mesh.triangle_count() {
        let base = tri * 3 + 1;
        writeln!(
            out,
            "f {a}//{a} {b}//{b} {c}//{c}",
            a = base,
            b = base + 1,
            c = base + 2
        )?;
    }
    out.flush()
}

/// Export `mesh` to a file at `path`, creating parent directories.
pub fn export_obj(path: &Path, mesh: &MeshBuffer) -> Result<(), AppError> {
    let to_error = |source| AppError::Export {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    let file = File::create(path).map_err(to_error)?;
    write_obj(BufWriter::new(file), mesh).map_err(to_error)?;
    info!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        "exported mesh"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use nebula_roam::{ShadingMode, TriangleSink, shade_triangle};

    fn two_triangle_mesh() -> MeshBuffer {
        let mut mesh = MeshBuffer::new();
        mesh.begin_frame(0.5);
        mesh.begin_patch(IVec2::new(8, 16));
        let corners = [IVec2::new(0, 4), IVec2::new(4, 0), IVec2::new(0, 0)];
        mesh.triangle(shade_triangle(corners, [10, 20, 30], ShadingMode::Height));
        mesh.triangle(shade_triangle(corners, [0, 0, 0], ShadingMode::Lit));
        mesh.end_patch();
        mesh
    }

    #[test]
    fn test_write_obj_layout() {
        let mut out = Vec::new();
        write_obj(&mut out, &two_triangle_mesh()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("v "), 6);
        assert_eq!(count("vn "), 6);
        assert_eq!(count("f "), 2);
        assert!(text.contains("f 4//4 5//5 6//6"));
    }

    #[test]
    fn test_vertices_are_in_world_space() {
        let mut out = Vec::new();
        write_obj(&mut out, &two_triangle_mesh()).unwrap();
        let text = String::from_utf8(out).unwrap();
        // First corner (0, 4) at height 10, translated by (8, 16), scale 0.5.
        let first = text.lines().find(|l| l.starts_with("v ")).unwrap();
        assert_eq!(first, "v 8 5 20");
    }

    #[test]
    fn test_empty_mesh_writes_header_only() {
        let mut out = Vec::new();
        write_obj(&mut out, &MeshBuffer::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().all(|l| l.starts_with('#') || l.starts_with('o')));
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meshes").join("last.obj");
        export_obj(&path, &two_triangle_mesh()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# nebula-roam terrain mesh"));
    }

    #[test]
    fn test_export_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file.
        let err = export_obj(dir.path(), &two_triangle_mesh()).unwrap_err();
        match err {
            AppError::Export { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
