/// Declares facade members together with their static [`MemberSpec`](crate::capability::MemberSpec) table.
///
/// Every member expands into an inherent `async fn` that builds the member
/// parameters and routes the call through `DeviceClient::exec`, plus an entry
/// in the module's `MEMBERS` table. Members implemented by hand are listed in
/// `with [...]` so that they still appear in the table.
macro_rules! facade {
    (@policy) => ($crate::capability::MemberPolicy::Optional);

    (@policy mandatory) => ($crate::capability::MemberPolicy::Mandatory);

    (@policy since platform7 => $fallback:ident $(($($arg:tt)*))?) => (
        $crate::capability::MemberPolicy::Since {
            version: $crate::capability::Introduced::Platform7,
            fallback: $crate::capability::Fallback::$fallback $(($($arg)*))?,
        }
    );

    (@policy since $version:literal => $fallback:ident $(($($arg:tt)*))?) => (
        $crate::capability::MemberPolicy::Since {
            version: $crate::capability::Introduced::In($version),
            fallback: $crate::capability::Fallback::$fallback $(($($arg)*))?,
        }
    );

    (@tier) => ($crate::session::TimeoutTier::Standard);

    (@tier $tier:ident) => ($crate::session::TimeoutTier::$tier);

    (@member_spec $name:literal $kind:ident [$($tier:ident)?] [$($policy:tt)*]) => (
        $crate::capability::MemberSpec {
            name: $name,
            kind: $crate::params::MemberKind::$kind,
            tier: facade!(@tier $($tier)?),
            policy: facade!(@policy $($policy)*),
        }
    );

    (@ret [] $ret:ty) => (<$ret as $crate::errors::ResultOk>::Ok);

    (@ret [$via:ty] $ret:ty) => ($via);

    (@param [] $param:ident) => ($param);

    (@param [$via:ty] $param:ident) => (<$via>::from($param));

    (
        impl $self_ty:ident $(with [$($extra:path),* $(,)?])? {
            $(
                $(#[doc = $doc:literal])*
                #[http($name:literal, method = $kind:ident $(, via = $via:ty)? $(, tier = $tier:ident)? $(, policy = $($policy:tt)+)?)]
                $(#[$member_attr:meta])*
                $member_vis:vis async fn $method:ident(
                    &self $(, #[http($param_name:literal $(, via = $param_via:ty)?)] $param:ident: $param_ty:ty)* $(,)?
                ) -> $ret:ty;
            )*
        }
    ) => {
        impl $self_ty {
            $(
                $(#[doc = $doc])*
                $(#[$member_attr])*
                $member_vis async fn $method(&self $(, $param: $param_ty)*) -> $ret {
                    const MEMBER: $crate::capability::MemberSpec =
                        facade!(@member_spec $name $kind [$($tier)?] [$($($policy)+)?]);

                    #[allow(unused_mut)]
                    let mut params = $crate::params::Params::new();
                    $(
                        params.insert($param_name, facade!(@param [$($param_via)?] $param))?;
                    )*

                    self.exec::<facade!(@ret [$($via)?] $ret)>(&MEMBER, params)
                        .await
                        $(.map(<$via>::into))?
                }
            )*
        }

        /// Static description of every member of this facade.
        pub(crate) const MEMBERS: &[$crate::capability::MemberSpec] = &[
            $($($extra,)*)?
            $(facade!(@member_spec $name $kind [$($tier)?] [$($($policy)+)?]),)*
        ];
    };

    (
        $(#[doc = $doc:literal])*
        pub struct $name:ident $(with [$($extra:path),* $(,)?])? {
            $($body:tt)*
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, derive_more::Deref)]
        pub struct $name($crate::api::DeviceClient);

        impl $name {
            pub(crate) const fn new_unchecked(device: $crate::api::DeviceClient) -> Self {
                Self(device)
            }

            /// Unwrap into the untyped facade.
            pub fn into_inner(self) -> $crate::api::DeviceClient {
                self.0
            }
        }

        impl TryFrom<$crate::api::DeviceClient> for $name {
            type Error = $crate::errors::Error;

            fn try_from(device: $crate::api::DeviceClient) -> $crate::errors::Result<Self> {
                let device_type = device.device_type();

                if device_type == $crate::api::DeviceType::$name {
                    Ok(Self(device))
                } else {
                    Err($crate::errors::Error::new(
                        $crate::errors::ErrorKind::InvalidArgument,
                        $crate::errors::ErrorOrigin::Client,
                        format_args!(concat!("{} is not a ", stringify!($name)), device_type),
                    ))
                }
            }
        }

        facade! {
            impl $name $(with [$($extra),*])? {
                $($body)*
            }
        }
    };
}

pub(crate) use facade;

/// Declares the supported device categories.
macro_rules! device_types {
    ($(
        #[cfg(feature = $feature:literal)]
        $name:ident = $path:literal, platform7 = $platform7:literal;
    )*) => (paste::paste! {
        /// Device category.
        ///
        /// Displays as the Alpaca URL path segment; serializes as the category
        /// name used by the management API.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            derive_more::Display,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub enum DeviceType {
            $(
                #[cfg(feature = $feature)]
                #[doc = concat!("`", $path, "`")]
                #[display($path)]
                $name,
            )*
        }

        impl DeviceType {
            /// Every category compiled into the crate.
            pub const ALL: &'static [Self] = &[
                $(
                    #[cfg(feature = $feature)]
                    Self::$name,
                )*
            ];

            /// First interface version of this category that belongs to ASCOM Platform 7.
            pub const fn platform7_interface_version(self) -> i32 {
                match self {
                    $(
                        #[cfg(feature = $feature)]
                        Self::$name => $platform7,
                    )*
                }
            }

            /// Static member table: members common to all devices followed by
            /// the category-specific ones.
            pub fn members(self) -> impl Iterator<Item = &'static $crate::capability::MemberSpec> {
                let specific: &'static [$crate::capability::MemberSpec] = match self {
                    $(
                        #[cfg(feature = $feature)]
                        Self::$name => [<$name:snake>]::MEMBERS,
                    )*
                };

                device::MEMBERS.iter().chain(specific)
            }

            /// Look up a member by name (ignoring ASCII case) and access kind.
            pub fn member(
                self,
                name: &str,
                kind: $crate::params::MemberKind,
            ) -> Option<&'static $crate::capability::MemberSpec> {
                self.members()
                    .find(|member| member.kind == kind && member.name.eq_ignore_ascii_case(name))
            }
        }

        /// A device facade tagged with its category.
        #[derive(Debug, Clone)]
        #[allow(missing_docs)]
        pub enum TypedDevice {
            $(
                #[cfg(feature = $feature)]
                $name([<$name:snake>]::$name),
            )*
        }

        impl std::ops::Deref for TypedDevice {
            type Target = DeviceClient;

            fn deref(&self) -> &DeviceClient {
                match self {
                    $(
                        #[cfg(feature = $feature)]
                        Self::$name(device) => device,
                    )*
                }
            }
        }

        impl DeviceClient {
            /// Wrap into the facade of this device's category.
            pub fn into_typed(self) -> TypedDevice {
                match self.device_type() {
                    $(
                        #[cfg(feature = $feature)]
                        DeviceType::$name => TypedDevice::$name([<$name:snake>]::$name::new_unchecked(self)),
                    )*
                }
            }
        }
    });
}

pub(crate) use device_types;
