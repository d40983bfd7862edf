// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// The maximum number of elements a list can hold. Keeping the count
/// strictly below the signed 32-bit limit keeps all subtree weight
/// arithmetic overflow-free on every platform.
pub(crate) const MAX_LEN: usize = i32::MAX as usize - 1;

/// The smallest batch for which inserting at either end of a list goes
/// through bulk-build plus concatenation instead of element-by-element
/// insertion.
pub(crate) const MIN_BULK_LOAD: usize = 16;
