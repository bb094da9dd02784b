use nalgebra::RealField;
use relax_grid::Field;
use std::io::Write;

/// Write one line per voxel in the form `x: 0 | y: 0 | z: 0 - 0.000000`
///
/// Voxels are listed with `y` outermost, then `z`, then `x`.
pub fn write_dump<T, W>(potential: &Field<T>, mut writer: W) -> std::io::Result<()>
where
    T: Copy + RealField,
    W: Write,
{
    let [x_extent, y_extent, z_extent] = potential.shape().extents();
    for y in 0..y_extent {
        for z in 0..z_extent {
            for x in 0..x_extent {
                writeln!(
                    writer,
                    "x: {x} | y: {y} | z: {z} - {:.6}",
                    potential.get(x, y, z)
                )?;
            }
        }
    }
    writer.flush()
}
