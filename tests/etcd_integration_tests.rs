// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the etcd store using Docker containers.

mod common;

#[cfg(feature = "etcd")]
mod etcd_tests {
    use coffee_config::adapters::EtcdStore;
    use coffee_config::domain::{
        ConfigError, ConfigKey, ConfigKeyResolver, ConfigValue, ConfigurationService,
    };
    use coffee_config::ports::KeyValueStore;
    use coffee_config::service::DefaultConfigService;
    use coffee_config::settings::{StoreBackend, StoreSettings};
    use testcontainers::{core::WaitFor, runners::SyncRunner, Container, GenericImage, ImageExt};

    use crate::common as docker_helpers;

    /// Starts an etcd container and returns it with its client endpoint.
    fn start_etcd() -> Option<(Container<GenericImage>, String)> {
        if !docker_helpers::is_docker_available() {
            docker_helpers::print_docker_unavailable_warning("etcd integration test");
            return None;
        }

        let container = GenericImage::new("quay.io/coreos/etcd", "v3.5.0")
            .with_exposed_port(2379.into())
            .with_wait_for(WaitFor::message_on_stderr("ready to serve client requests"))
            .with_env_var("ETCD_ADVERTISE_CLIENT_URLS", "http://0.0.0.0:2379")
            .with_env_var("ETCD_LISTEN_CLIENT_URLS", "http://0.0.0.0:2379")
            .start()
            .ok()?;
        let port = container.get_host_port_ipv4(2379).ok()?;

        Some((container, format!("127.0.0.1:{}", port)))
    }

    fn seed(store: &EtcdStore, pairs: &[(&str, &str)]) {
        for (k, v) in pairs {
            store.put(&ConfigKey::from(*k), ConfigValue::from(*v)).unwrap();
        }
    }

    #[test]
    fn test_etcd_put_get_roundtrip() {
        let Some((_container, endpoint)) = start_etcd() else {
            return;
        };
        let store = EtcdStore::connect(&[endpoint], Some("test/")).unwrap();

        store
            .put(&ConfigKey::from("database.host"), ConfigValue::from("localhost"))
            .unwrap();

        assert_eq!(
            store.get_str("database.host").unwrap().unwrap().as_str(),
            "localhost"
        );
        assert!(store.get_str("database.port").unwrap().is_none());
    }

    #[test]
    fn test_etcd_resolves_indirection_chain() {
        let Some((_container, endpoint)) = start_etcd() else {
            return;
        };
        let store = EtcdStore::connect(&[endpoint], Some("app/")).unwrap();
        seed(
            &store,
            &[
                ("service.url", "{service.url.blue}"),
                ("service.url.blue", "{service.url.blue.v2}"),
                ("service.url.blue.v2", "https://blue-v2.internal"),
            ],
        );

        let resolver = ConfigKeyResolver::new(store);
        let resolution = resolver
            .resolve_chain(&ConfigKey::from("service.url"))
            .unwrap();

        assert_eq!(
            resolution.value.unwrap().as_str(),
            "https://blue-v2.internal"
        );
        assert_eq!(resolution.hops(), 2);
    }

    #[test]
    fn test_etcd_detects_cycle() {
        let Some((_container, endpoint)) = start_etcd() else {
            return;
        };
        let store = EtcdStore::connect(&[endpoint], None).unwrap();
        seed(&store, &[("a", "{b}"), ("b", "{c}"), ("c", "{a}")]);

        let resolver = ConfigKeyResolver::new(store);
        assert!(matches!(
            resolver.resolve(&ConfigKey::from("a")),
            Err(ConfigError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_etcd_sees_external_changes() {
        let Some((_container, endpoint)) = start_etcd() else {
            return;
        };
        let writer = EtcdStore::connect(&[endpoint.clone()], Some("live/")).unwrap();
        let reader = ConfigKeyResolver::new(EtcdStore::connect(&[endpoint], Some("live/")).unwrap());

        seed(&writer, &[("flag", "{flag.off}"), ("flag.off", "false"), ("flag.on", "true")]);
        assert_eq!(
            reader.resolve(&ConfigKey::from("flag")).unwrap().unwrap().as_str(),
            "false"
        );

        seed(&writer, &[("flag", "{flag.on}")]);
        assert_eq!(
            reader.resolve(&ConfigKey::from("flag")).unwrap().unwrap().as_str(),
            "true"
        );
    }

    #[test]
    fn test_etcd_delete() {
        let Some((_container, endpoint)) = start_etcd() else {
            return;
        };
        let store = EtcdStore::connect(&[endpoint], Some("test/")).unwrap();
        seed(&store, &[("gone.soon", "x")]);

        assert!(store.delete(&ConfigKey::from("gone.soon")).unwrap());
        assert!(!store.delete(&ConfigKey::from("gone.soon")).unwrap());
        assert!(store.get_str("gone.soon").unwrap().is_none());
    }

    #[test]
    fn test_etcd_service_from_settings() {
        let Some((_container, endpoint)) = start_etcd() else {
            return;
        };
        let mut settings = StoreSettings {
            backend: StoreBackend::Etcd,
            ..StoreSettings::default()
        };
        settings.etcd.endpoints = vec![endpoint];
        settings.etcd.prefix = Some("svc/".to_string());

        let service = DefaultConfigService::from_settings(&settings).unwrap();
        service
            .put(&ConfigKey::from("port"), ConfigValue::from("{port.default}"))
            .unwrap();
        service
            .put(&ConfigKey::from("port.default"), ConfigValue::from("8080"))
            .unwrap();

        assert_eq!(service.store_name(), "etcd");
        assert_eq!(service.get_str("port").unwrap().as_i64("port").unwrap(), 8080);
    }
}
