use bitflags::bitflags;

bitflags! {
    /// Access flags on classes
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.1-200-E.1
    pub struct ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

bitflags! {
    /// Access flags on methods
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.6-200-A.1
    pub struct MethodAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

bitflags! {
    /// Access flags on fields
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.5-200-A.1
    pub struct FieldAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
    }
}

/// Member flags that decide visibility
///
/// A member with none of `public`, `protected`, or `private` is package-visible, which matters
/// for optimizations that move code between classes.
pub trait Visibility {
    fn is_package_visible(&self) -> bool;
}

impl Visibility for MethodAccessFlags {
    fn is_package_visible(&self) -> bool {
        !self.intersects(Self::PUBLIC | Self::PROTECTED | Self::PRIVATE)
    }
}

impl Visibility for FieldAccessFlags {
    fn is_package_visible(&self) -> bool {
        !self.intersects(Self::PUBLIC | Self::PROTECTED | Self::PRIVATE)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn package_visibility() {
        assert!(MethodAccessFlags::STATIC.is_package_visible());
        assert!(!(MethodAccessFlags::PRIVATE | MethodAccessFlags::STATIC).is_package_visible());
        assert!(FieldAccessFlags::FINAL.is_package_visible());
        assert!(!FieldAccessFlags::PROTECTED.is_package_visible());
    }
}
