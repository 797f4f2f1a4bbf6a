//! 5×5 Gaussian weights used to blend neighboring column properties.
//!
//! Computed once per process and shared read-only by every generator and
//! worker thread.

use std::sync::OnceLock;

/// Kernel radius; the table spans `-RADIUS..=RADIUS` on both axes.
pub const KERNEL_RADIUS: i32 = 2;

/// Side length of the kernel table.
pub const KERNEL_SIZE: usize = (KERNEL_RADIUS * 2 + 1) as usize;

static KERNEL: OnceLock<[[f64; KERNEL_SIZE]; KERNEL_SIZE]> = OnceLock::new();

/// The shared kernel table, indexed `[sx + RADIUS][sz + RADIUS]`.
///
/// The first caller builds it; concurrent first calls all observe the same
/// table.
pub fn gaussian_kernel() -> &'static [[f64; KERNEL_SIZE]; KERNEL_SIZE] {
    KERNEL.get_or_init(build_kernel)
}

/// Weight at offset `(sx, sz)`, both in `-2..=2`. Offsets outside the kernel
/// weigh zero.
pub fn kernel_weight(sx: i32, sz: i32) -> f64 {
    if sx.abs() > KERNEL_RADIUS || sz.abs() > KERNEL_RADIUS {
        return 0.0;
    }
    gaussian_kernel()[(sx + KERNEL_RADIUS) as usize][(sz + KERNEL_RADIUS) as usize]
}

fn build_kernel() -> [[f64; KERNEL_SIZE]; KERNEL_SIZE] {
    let bell_size = 1.0 / f64::from(KERNEL_RADIUS);
    let bell_height = 2.0 * f64::from(KERNEL_RADIUS);

    let mut table = [[0.0; KERNEL_SIZE]; KERNEL_SIZE];
    for sx in -KERNEL_RADIUS..=KERNEL_RADIUS {
        for sz in -KERNEL_RADIUS..=KERNEL_RADIUS {
            let bx = bell_size * f64::from(sx);
            let bz = bell_size * f64::from(sz);
            table[(sx + KERNEL_RADIUS) as usize][(sz + KERNEL_RADIUS) as usize] =
                bell_height * libm::exp(-(bx * bx + bz * bz) / 2.0);
        }
    }
    table
}
