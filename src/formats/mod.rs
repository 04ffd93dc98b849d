//! Format-specific parsers.
//!
//! Every module exposes one `pub static FORMAT: FormatInfo` that the
//! [registry](crate::registry) lists. Parsers are never called directly;
//! they are reached through [`FormatInfo::check`](crate::registry::FormatInfo::check)
//! and [`FormatInfo::fill`](crate::registry::FormatInfo::fill).
//!
//! Text formats:
//!
//! - [`cpi`] - Sietronics Sieray CPI
//! - [`uxd`] - Siemens/Bruker Diffrac-AT UXD
//! - [`rigaku_dat`] - Rigaku `.dat`
//! - [`philips_udf`] - Philips UDF
//! - [`xfit_xdd`] - XFIT/Koalariet XDD
//! - [`riet7`] - RIET7/ILL_D1A5/PSI_DMC DAT
//! - [`dbws`] - DBWS data file
//! - [`text`] - plain columns of numbers
//!
//! Binary formats:
//!
//! - [`bruker_raw`] - Siemens/Bruker Diffrac-AT RAW v1/v2/v3
//! - [`winspec_spe`] - Princeton Instruments WinSpec SPE
//! - [`philips_raw`] - Philips RD raw scan V3/V5
//! - [`canberra_mca`] - Canberra MCA

pub(crate) mod common;

/// Sietronics Sieray CPI.
pub mod cpi;

/// Siemens/Bruker Diffrac-AT UXD.
pub mod uxd;

/// Rigaku `.dat`.
pub mod rigaku_dat;

/// Siemens/Bruker Diffrac-AT RAW.
pub mod bruker_raw;

/// Philips UDF.
pub mod philips_udf;

/// Princeton Instruments WinSpec SPE.
pub mod winspec_spe;

/// Philips RD raw scan.
pub mod philips_raw;

/// Canberra MCA.
pub mod canberra_mca;

/// XFIT/Koalariet XDD.
pub mod xfit_xdd;

/// RIET7/ILL_D1A5/PSI_DMC DAT.
pub mod riet7;

/// DBWS data file.
pub mod dbws;

/// Plain columns of numbers.
pub mod text;
