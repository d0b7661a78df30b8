// ==============================================================================
// lib.rs - GWAS Report Library
// ==============================================================================
// Description: Library interface for the SNP extractor and plot generator
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod parsers;
pub mod models;
pub mod stats;
pub mod config;
pub mod output;
pub mod extractor;
pub mod plots;
pub mod orchestrator;
pub mod cli;
