use nix::sys::utsname::uname;

use crate::error::SystemResult;

/// Returns the machine hardware name reported by the kernel (`uname -m`),
/// e.g. `x86_64` or `i686`.
pub fn machine_arch() -> SystemResult<String> {
    let info = uname()?;
    Ok(info.machine().to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_arch() {
        let arch = machine_arch().unwrap();
        assert!(!arch.is_empty());

        #[cfg(all(target_arch = "x86_64", target_os = "linux"))]
        assert_eq!(arch, "x86_64");
    }
}
