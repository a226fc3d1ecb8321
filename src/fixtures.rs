#[cfg(test)]
pub mod test {
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    use crate::{Properties, ScalarValue, Settings};

    #[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Mode {
        #[default]
        Fast,
        Slow,
    }

    impl ScalarValue for Mode {}

    crate::settings! {
        #[derive(Debug)]
        pub struct Server {
            /// The application host.
            pub scalar host: String = "localhost",
            pub scalar port: u16 = "8080",
            pub scalar mode: Mode,
            pub nested database: Database,
            pub collection mirrors: Vec<Mirror>,
        }
    }

    crate::settings! {
        #[derive(Debug)]
        pub struct Database {
            /// Connection string URL.
            pub scalar url: Option<String>,
            /// Connection pool size.
            pub scalar pool_size: usize = "5",
        }
    }

    crate::settings! {
        #[derive(Debug)]
        pub struct Mirror {
            pub scalar url: String,
            pub scalar weight: u32 = "1",
        }
    }

    crate::settings! {
        #[derive(Debug)]
        pub struct Greeter {
            pub scalar greeting as "Greeting": String = "Hello",
            pub scalar count as "Count": i32,
            pub scalar when as "When": NaiveDate = "2000-01-01",
        }
    }

    crate::settings! {
        #[derive(Debug)]
        pub struct Nullables {
            pub scalar nothing as "DefNull": Option<i32> = "null",
            pub scalar zero: i32,
            pub scalar answer as "DefFortyTwo": Option<f64> = "42.1234",
            pub scalar label: Option<String>,
        }
    }

    crate::settings! {
        pub struct Tree {
            pub scalar name: String,
            pub collection children: Vec<Tree>,
        }
    }

    // Collections that lead back to each other.
    crate::settings! {
        pub struct Swarm {
            pub collection peers: Vec<Peer>,
        }
    }

    crate::settings! {
        pub struct Peer {
            pub scalar id: u32,
            pub collection swarms: Vec<Swarm>,
        }
    }

    // -- Hand-written declaration ----------------------------------------------

    pub struct Endpoint {
        pub address: String,
        pub retries: u8,
        pub backup: Database,
    }

    impl Settings for Endpoint {
        fn blank() -> Self {
            Endpoint {
                address: String::new(),
                retries: 0,
                backup: Database::blank(),
            }
        }

        fn declare(p: &mut Properties<Self>) {
            p.scalar("address", |e| &e.address, |e| &mut e.address)
                .rename("addr")
                .default("127.0.0.1");
            p.scalar("retries", |e| &e.retries, |e| &mut e.retries)
                .default("3");
            p.nested("backup", |e| &e.backup, |e| &mut e.backup);
        }
    }

    // -- Invalid declarations ----------------------------------------------------

    crate::settings! {
        pub struct BadDefault {
            pub scalar port: u16 = "lots",
        }
    }

    crate::settings! {
        pub struct DuplicateNames {
            pub scalar first as "Name": String,
            pub scalar second as "Name": String,
        }
    }

    crate::settings! {
        pub struct DefaultOnNested {
            pub nested database: Database = "{}",
        }
    }

    crate::settings! {
        pub struct HoldsBadItems {
            pub scalar name: String,
            pub collection items: Vec<BadDefault>,
        }
    }

    crate::settings! {
        pub struct HoldsCyclicItems {
            pub collection items: Vec<CycleA>,
        }
    }

    // Rejected before any instance exists.

    pub struct CycleA {
        pub b: CycleB,
    }

    pub struct CycleB {
        pub a: Box<CycleA>,
    }

    impl Settings for CycleA {
        fn blank() -> Self {
            unreachable!("cyclic settings are never constructed")
        }

        fn declare(p: &mut Properties<Self>) {
            p.nested("b", |s| &s.b, |s| &mut s.b);
        }
    }

    impl Settings for CycleB {
        fn blank() -> Self {
            unreachable!("cyclic settings are never constructed")
        }

        fn declare(p: &mut Properties<Self>) {
            p.nested("a", |s| &*s.a, |s| &mut *s.a);
        }
    }

    pub struct SelfNested {
        pub inner: Box<SelfNested>,
    }

    impl Settings for SelfNested {
        fn blank() -> Self {
            unreachable!("cyclic settings are never constructed")
        }

        fn declare(p: &mut Properties<Self>) {
            p.nested("inner", |s| &*s.inner, |s| &mut *s.inner);
        }
    }

    #[test]
    fn server_loads_defaults() {
        let server = Server::create();
        assert_eq!(server.host, "localhost");
        assert_eq!(server.port, 8080);
        assert_eq!(server.mode, Mode::Fast);
        assert_eq!(server.database.url, None);
        assert_eq!(server.database.pool_size, 5);
        assert!(server.mirrors.is_empty());
    }
}
