// Rust Coin Address Library
// Written by
//   The coinaddr developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! Account names of chains that address accounts by name rather than by key hash.

/// Characters allowed in an EOS account name.
pub const EOS_ACCOUNT_CHARS: &str = ".12345abcdefghijklmnopqrstuvwxyz";

/// Longest EOS account name.
pub const EOS_ACCOUNT_MAX_LEN: usize = 12;

/// Whether `name` has at most 12 characters, all drawn from [`EOS_ACCOUNT_CHARS`].
///
/// Only the character set and length are checked; the empty name passes.
pub fn is_eos_account(name: &str) -> bool {
    name.len() <= EOS_ACCOUNT_MAX_LEN && name.chars().all(|c| EOS_ACCOUNT_CHARS.contains(c))
}

/// Whether `name` is 5 to 11 characters of `[a-z0-9_]`.
pub fn is_iost_account(name: &str) -> bool {
    (5..=11).contains(&name.len())
        && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}
