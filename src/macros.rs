// SPDX-FileCopyrightText: 2023 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

/// Creates the pixel format enum with stable numeric codes, a list of every variant in code
/// order, and a checked conversion from raw codes (such as on-disk format tags).
macro_rules! define_pixel_formats {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal
            ),+$(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $code,
            )+
        }

        impl $name {
            /// Every format, ordered by code.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Number of formats, and one past the highest code.
            pub const COUNT: usize = Self::ALL.len();
        }

        impl TryFrom<u32> for $name {
            type Error = crate::Error;

            fn try_from(code: u32) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(crate::Error::InvalidDescriptorLookup { code }),
                }
            }
        }
    };
}

/// Creates the table of fast pixel conversions. Each entry becomes a function named after its
/// format pair (A8R8G8B8 => L8 becomes `a8r8g8b8_to_l8`) that maps a source element, read as a
/// native-endian integer, to a destination element.
macro_rules! define_pixel_conversions {
    (
        $(
            $src:ident => $dst:ident: |$value:ident| $body:expr;
        )+
    ) => {
        ::paste::paste! {
            $(
                #[inline]
                fn [<$src:lower _to_ $dst:lower>]($value: u32) -> u32 {
                    $body
                }
            )+

            /// Every fast path in the registry.
            pub const PIXEL_CONVERSIONS: &[PixelConversion] = &[
                $(
                    PixelConversion {
                        src: PixelFormat::$src,
                        dst: PixelFormat::$dst,
                        convert: [<$src:lower _to_ $dst:lower>],
                    },
                )+
            ];

            fn find_conversion(src: PixelFormat, dst: PixelFormat) -> Option<PixelConversion> {
                match (src, dst) {
                    $(
                        (PixelFormat::$src, PixelFormat::$dst) => Some(PixelConversion {
                            src,
                            dst,
                            convert: [<$src:lower _to_ $dst:lower>],
                        }),
                    )+
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use define_pixel_conversions;
pub(crate) use define_pixel_formats;
