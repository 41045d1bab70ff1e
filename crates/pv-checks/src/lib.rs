//! # pv-checks
//!
//! Read-only checks against a Buildroot output tree.
//!
//! Every check inspects one or more paths under the build root and returns
//! exactly one [`pv_core::CheckResult`]. Checks never write to the tree and
//! never return errors: I/O failures are folded into the result as a warning
//! (or a failure, where the check's policy already fails on absence).
//!
//! ```text
//! <root>/
//! ├── board/raspberrypi/overlay/etc/network/interfaces
//! └── output/
//!     ├── images/   sdcard.img, Image, *.dtb, rootfs.ext4, boot.vfat, rpi-firmware/
//!     ├── target/   the root filesystem staged for the image
//!     └── host/     cross toolchain
//! ```
//!
//! The checks are a closed set ([`Check`]) grouped into four display
//! [`Phase`]s.

pub mod artifacts;
pub mod check;
pub mod command;
pub mod configuration;
pub mod paths;
pub mod probe;
pub mod software;
pub mod system;

pub use check::{Check, CheckContext, Phase};
pub use command::{CommandOutcome, CommandProbe};
pub use paths::BuildPaths;
