//! Fixed package sets installed and verified by the bootstrapper

/// Packaging toolchain upgraded before anything else is installed
pub const TOOLCHAIN_PACKAGES: &[&str] = &["pip", "setuptools", "wheel"];

/// Base packages, installed as one batch in this order
pub const BASE_PACKAGES: &[&str] = &[
    "numpy",
    "scipy",
    "pandas",
    "scikit-learn",
    "matplotlib",
    "seaborn",
    "tqdm",
    "requests",
    "pyyaml",
    "rich",
    "ipdb",
];

/// Numerical backend and its companion libraries, installed from the
/// variant-specific index
pub const BACKEND_PACKAGES: &[&str] = &["torch", "torchvision", "torchaudio"];

/// Package name → importable module name used to confirm installation
pub const VERIFICATION_SET: &[(&str, &str)] = &[
    ("numpy", "numpy"),
    ("scipy", "scipy"),
    ("pandas", "pandas"),
    ("scikit-learn", "sklearn"),
    ("matplotlib", "matplotlib"),
    ("seaborn", "seaborn"),
    ("tqdm", "tqdm"),
    ("requests", "requests"),
    ("pyyaml", "yaml"),
    ("rich", "rich"),
    ("ipdb", "ipdb"),
    ("torch", "torch"),
    ("torchvision", "torchvision"),
    ("torchaudio", "torchaudio"),
];

/// Map an import name back to its package name
pub fn package_for_module(module: &str) -> Option<&'static str> {
    VERIFICATION_SET
        .iter()
        .find(|(_, m)| *m == module)
        .map(|(package, _)| *package)
}
