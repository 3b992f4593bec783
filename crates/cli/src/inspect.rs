use std::io::Write;

use anyhow::Context;
use dither_mesh::{DefaultMesh, TriangleMesh};

use crate::args;

pub fn inspect_command<W: Write>(args: args::InspectArgs, out: &mut W) -> anyhow::Result<()> {
    let mesh = dither_obj::read_obj::<DefaultMesh, _>(&args.obj_path)
        .with_context(|| format!("reading {}", args.obj_path))?;
    let bounds = mesh.bounding_box();

    writeln!(out, "triangles: {}", mesh.triangle_count())?;
    writeln!(out, "vertices:  {}", mesh.vertex_count())?;
    writeln!(out, "floats:    {}", mesh.as_floats().len())?;
    if bounds.is_empty() {
        writeln!(out, "bounds:    empty")?;
        return Ok(());
    }
    writeln!(out, "min:       {} {} {}", bounds.min.x, bounds.min.y, bounds.min.z)?;
    writeln!(out, "max:       {} {} {}", bounds.max.x, bounds.max.y, bounds.max.z)?;
    writeln!(
        out,
        "center:    {} {} {}",
        bounds.center.x, bounds.center.y, bounds.center.z
    )?;
    Ok(())
}
