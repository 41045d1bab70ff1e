//! The closed set of checks.

use std::fmt;

use pv_core::CheckResult;

use crate::command::CommandProbe;
use crate::paths::BuildPaths;
use crate::{artifacts, configuration, software, system};

/// Display grouping of checks. Has no effect on classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Boot and image artifacts
    CriticalArtifacts,
    /// Packages staged into the root filesystem
    SoftwarePresence,
    /// Board configuration files
    Configuration,
    /// Modules, utilities, firmware, image size, toolchain
    SystemCompleteness,
}

impl Phase {
    /// Heading printed before the phase's checks.
    pub fn title(&self) -> &'static str {
        match self {
            Phase::CriticalArtifacts => "Critical Artifacts",
            Phase::SoftwarePresence => "Software Presence",
            Phase::Configuration => "Configuration",
            Phase::SystemCompleteness => "System Completeness",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Everything a check may look at.
pub struct CheckContext<'a> {
    /// Resolved build tree layout
    pub paths: &'a BuildPaths,
    /// Command runner for deeper verification; `None` disables command probes
    pub commands: Option<&'a CommandProbe>,
}

impl<'a> CheckContext<'a> {
    /// Context with filesystem probes only.
    pub fn new(paths: &'a BuildPaths) -> Self {
        Self {
            paths,
            commands: None,
        }
    }

    /// Enable command probes.
    pub fn with_commands(mut self, commands: &'a CommandProbe) -> Self {
        self.commands = Some(commands);
        self
    }
}

/// One validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// Final `sdcard.img`
    ImageFile,
    /// Kernel `Image` in the images directory
    KernelImage,
    /// BCM2711 device tree blob
    DeviceTree,
    /// ext4 root filesystem image
    RootFilesystem,
    /// vfat boot partition image
    BootPartition,
    /// Python interpreter or stdlib in the target
    Python3,
    /// OpenCV core libraries in the target. Advisory
    OpenCv4,
    /// Dropbear SSH server in the target
    SshServer,
    /// `i2cdetect` in the target. Advisory
    I2cTools,
    /// Static eth0 address in the overlay network configuration
    NetworkConfig,
    /// Wireless credentials replaced. Advisory
    WifiConfig,
    /// Startup script from the custom overlay
    CustomOverlay,
    /// Non-empty `lib/modules`. Advisory
    KernelModules,
    /// At least two common utilities
    SystemUtilities,
    /// BCM2711 boot firmware
    RpiFirmware,
    /// Image size within the expected range
    ImageSize,
    /// Host cross compiler, optionally executed
    Toolchain,
}

impl Check {
    /// All checks in execution order.
    pub const ALL: [Check; 17] = [
        // Critical artifacts
        Check::ImageFile,
        Check::KernelImage,
        Check::DeviceTree,
        Check::RootFilesystem,
        Check::BootPartition,
        // Software presence
        Check::Python3,
        Check::OpenCv4,
        Check::SshServer,
        Check::I2cTools,
        // Configuration
        Check::NetworkConfig,
        Check::WifiConfig,
        Check::CustomOverlay,
        // System completeness
        Check::KernelModules,
        Check::SystemUtilities,
        Check::RpiFirmware,
        Check::ImageSize,
        Check::Toolchain,
    ];

    /// Name recorded in the result log.
    pub fn name(&self) -> &'static str {
        match self {
            Check::ImageFile => "Image File",
            Check::KernelImage => "Kernel Image",
            Check::DeviceTree => "Device Tree",
            Check::RootFilesystem => "Root Filesystem",
            Check::BootPartition => "Boot Partition",
            Check::Python3 => "Python3",
            Check::OpenCv4 => "OpenCV4",
            Check::SshServer => "SSH Server",
            Check::I2cTools => "I2C Tools",
            Check::NetworkConfig => "Network Config",
            Check::WifiConfig => "WiFi Config",
            Check::CustomOverlay => "Custom Overlay",
            Check::KernelModules => "Kernel Modules",
            Check::SystemUtilities => "System Utilities",
            Check::RpiFirmware => "RPi Firmware",
            Check::ImageSize => "Image Size",
            Check::Toolchain => "Toolchain",
        }
    }

    /// Display phase.
    pub fn phase(&self) -> Phase {
        match self {
            Check::ImageFile
            | Check::KernelImage
            | Check::DeviceTree
            | Check::RootFilesystem
            | Check::BootPartition => Phase::CriticalArtifacts,
            Check::Python3 | Check::OpenCv4 | Check::SshServer | Check::I2cTools => {
                Phase::SoftwarePresence
            }
            Check::NetworkConfig | Check::WifiConfig | Check::CustomOverlay => {
                Phase::Configuration
            }
            Check::KernelModules
            | Check::SystemUtilities
            | Check::RpiFirmware
            | Check::ImageSize
            | Check::Toolchain => Phase::SystemCompleteness,
        }
    }

    /// Run the check. Always yields exactly one result named [`Check::name`].
    pub fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        let paths = ctx.paths;
        let result = match self {
            Check::ImageFile => artifacts::image_file(paths),
            Check::KernelImage => artifacts::kernel_image(paths),
            Check::DeviceTree => artifacts::device_tree(paths),
            Check::RootFilesystem => artifacts::root_filesystem(paths),
            Check::BootPartition => artifacts::boot_partition(paths),
            Check::Python3 => software::python3(paths),
            Check::OpenCv4 => software::opencv(paths),
            Check::SshServer => software::ssh_server(paths),
            Check::I2cTools => software::i2c_tools(paths),
            Check::NetworkConfig => configuration::network_config(paths),
            Check::WifiConfig => configuration::wifi_config(paths),
            Check::CustomOverlay => configuration::custom_overlay(paths),
            Check::KernelModules => system::kernel_modules(paths),
            Check::SystemUtilities => system::utilities(paths),
            Check::RpiFirmware => system::firmware(paths),
            Check::ImageSize => system::image_size(paths),
            Check::Toolchain => system::toolchain(paths, ctx.commands),
        };

        debug_assert_eq!(result.name, self.name());
        result
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
