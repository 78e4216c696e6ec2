// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod calc;
pub mod doctor;
pub mod earnings;
pub mod employees;
pub mod importer;
pub mod payroll;
pub mod periods;
pub mod settings;
