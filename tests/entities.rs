// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for entity discovery and entity commands.

mod common;

use std::sync::Arc;

use common::{MockApi, MockDevice, drain, manager_with, position, snapshot};
use homepilot_lib::entity::{
    ClimateEntity, ColorMode, CoverEntity, CoverFeatures, Entity, EntityCategory, FirmwareUpdate,
    HvacMode, LightEntity, LightTurnOn, PingButton, Platform, SensorEntity, SensorKind,
    SensorValue, SwitchEntity, SwitchKind, setup_entities,
};
use homepilot_lib::event::StateEvent;
use homepilot_lib::manager::{EntryOptions, ManagerConfig};
use homepilot_lib::{
    Capabilities, ContactState, CoverType, DeviceAttributes, DeviceCommand, DeviceDescriptor,
    DeviceId, DeviceKind, Error, HubDevice,
};
use serde_json::json;

// ============================================================================
// Discovery
// ============================================================================

mod setup {
    use super::*;

    #[tokio::test]
    async fn builds_entities_per_capability() {
        let api = MockApi::new();
        let devices = [
            MockDevice::hub().shared(),
            MockDevice::new("10", DeviceKind::Cover)
                .with_capabilities(
                    Capabilities::builder()
                        .with_position()
                        .with_tilt()
                        .with_ventilation_position_config()
                        .with_ping()
                        .build(),
                )
                .shared(),
            MockDevice::new("20", DeviceKind::Sensor)
                .with_capabilities(
                    Capabilities::builder()
                        .with_temperature()
                        .with_contact_state()
                        .with_battery_level()
                        .build(),
                )
                .shared(),
            MockDevice::new("21", DeviceKind::Sensor)
                .with_capabilities(Capabilities::builder().with_contact_state().build())
                .shared(),
            MockDevice::new("30", DeviceKind::Thermostat)
                .with_capabilities(
                    Capabilities::builder()
                        .with_temperature()
                        .with_battery_level()
                        .build(),
                )
                .shared(),
            MockDevice::new("40", DeviceKind::Switch).shared(),
            MockDevice::new("50", DeviceKind::Actuator).shared(),
            MockDevice::new("60", DeviceKind::Light).shared(),
        ];
        let manager = manager_with(&api, &devices, ManagerConfig::default());
        let options = EntryOptions::new().exclude("40").ternary_contact_sensor("20");

        let entities = setup_entities(&manager, &options);

        let ids: Vec<_> = entities.iter().map(Entity::unique_id).collect();
        assert_eq!(
            ids,
            vec![
                "uid-1_led_status",
                "uid-1_auto_update",
                "uid-1_fw_update",
                "uid10",
                "uid10_ventilation_position_mode",
                "uid10_ping",
                "uid20_ftemp",
                "uid20_fcontact_state",
                "uid20_fbattery_level",
                "uid30",
                "uid30_fbattery_level",
                "uid50",
                "uid60",
            ]
        );

        let platforms: Vec<_> = entities.iter().map(Entity::platform).collect();
        assert_eq!(platforms[2], Platform::Update);
        assert_eq!(platforms[9], Platform::Climate);
        assert_eq!(platforms[12], Platform::Light);
    }

    #[tokio::test]
    async fn excluded_devices_get_nothing() {
        let api = MockApi::new();
        let devices = [MockDevice::new("10", DeviceKind::Cover)
            .with_capabilities(Capabilities::builder().with_ping().build())
            .shared()];
        let manager = manager_with(&api, &devices, ManagerConfig::default());

        let entities = setup_entities(&manager, &EntryOptions::new().exclude("10"));

        assert!(entities.is_empty());
    }
}

// ============================================================================
// Entity base
// ============================================================================

mod base {
    use super::*;

    #[tokio::test]
    async fn device_info_and_availability() {
        let api = MockApi::new();
        api.set_fleet_state("10", snapshot(json!({ "Position": 10 })));
        let device = MockDevice::new("10", DeviceKind::Switch)
            .with_descriptor(DeviceDescriptor::new("uid10", "Garden", "Switch 2"))
            .shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let entity = SwitchEntity::new(manager, device.clone(), SwitchKind::Device);

        let info = entity.base().device_info();
        assert_eq!(info.identifiers, ("rademacher", DeviceId::new("10")));
        assert_eq!(info.name, "Garden");
        assert_eq!(info.model, "Switch 2");
        assert_eq!(info.manufacturer, "Rademacher");

        device.set_available(false);
        assert!(!entity.base().available());
        assert_eq!(entity.base().device_class(), Some("switch"));
        assert_eq!(entity.base().entity_category(), None);
    }
}

// ============================================================================
// Covers
// ============================================================================

mod cover {
    use super::*;

    #[tokio::test]
    async fn features_follow_capabilities() {
        let api = MockApi::new();
        let device = MockDevice::new("10", DeviceKind::Cover)
            .with_descriptor(
                DeviceDescriptor::new("uid10", "Garage", "Drive").with_cover_type(CoverType::Garage),
            )
            .with_capabilities(Capabilities::builder().with_position().build())
            .shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());

        let cover = CoverEntity::new(manager, device);

        assert_eq!(cover.base().device_class(), Some("garage"));
        let features = cover.supported_features();
        assert!(features.contains(
            CoverFeatures::OPEN | CoverFeatures::CLOSE | CoverFeatures::STOP
        ));
        assert!(features.contains(CoverFeatures::SET_POSITION));
        assert!(!features.contains(CoverFeatures::OPEN_TILT));
    }

    #[tokio::test]
    async fn commands_request_a_fleet_refresh() {
        let api = MockApi::new();
        api.set_fleet_state("10", position(30));
        let device = MockDevice::new("10", DeviceKind::Cover).shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let mut events = manager.subscribe();
        let cover = CoverEntity::new(Arc::clone(&manager), device.clone());

        cover.set_cover_position(130).await.unwrap();

        assert_eq!(device.commands(), vec![DeviceCommand::SetCoverPosition(100)]);
        assert_eq!(api.fleet_calls(), 1);
        assert_eq!(cover.current_cover_position(), Some(30));
        assert_eq!(drain(&mut events), vec![StateEvent::Refreshed]);
    }
}

// ============================================================================
// Switches
// ============================================================================

mod switch {
    use super::*;

    #[tokio::test]
    async fn toggle_refreshes_the_device() {
        let api = MockApi::new();
        api.set_device_states("40", [snapshot(json!({ "On": true }))]);
        let device = MockDevice::new("40", DeviceKind::Switch)
            .with_attributes(DeviceAttributes {
                is_on: Some(false),
                ..DeviceAttributes::default()
            })
            .shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let mut events = manager.subscribe();
        let switch = SwitchEntity::new(manager, device.clone(), SwitchKind::Device);

        switch.toggle().await.unwrap();

        assert_eq!(device.commands(), vec![DeviceCommand::TurnOn]);
        assert_eq!(api.device_calls(), 1);
        assert_eq!(switch.is_on(), Some(true));
        assert_eq!(
            drain(&mut events),
            vec![StateEvent::device_changed(DeviceId::new("40"))]
        );
    }

    #[tokio::test]
    async fn hub_led_switch_is_a_config_entity() {
        let api = MockApi::new();
        api.set_hub_state(snapshot(json!({ "Led": false })));
        let hub = MockDevice::hub().shared();
        let manager = manager_with(&api, &[hub.clone()], ManagerConfig::default());
        let led = SwitchEntity::new(manager, hub.clone(), SwitchKind::HubLed);

        led.turn_off().await.unwrap();

        assert_eq!(led.base().unique_id(), "uid-1_led_status");
        assert_eq!(led.base().name(), "Device -1 LED Status");
        assert_eq!(led.base().entity_category(), Some(EntityCategory::Config));
        assert_eq!(hub.commands(), vec![DeviceCommand::TurnLedOff]);
        assert_eq!(api.hub_calls(), 1);
        assert_eq!(led.is_on(), Some(false));
    }
}

// ============================================================================
// Lights
// ============================================================================

mod light {
    use super::*;

    #[tokio::test]
    async fn actuator_brightness_is_scaled() {
        let api = MockApi::new();
        api.set_device_states("50", [snapshot(json!({ "Brightness": 50, "On": true }))]);
        let device = MockDevice::new("50", DeviceKind::Actuator).shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let light = LightEntity::actuator(manager, device.clone());

        light
            .turn_on(LightTurnOn::new().with_brightness(128))
            .await
            .unwrap();

        assert_eq!(device.commands(), vec![DeviceCommand::SetBrightness(50)]);
        assert_eq!(light.brightness(), Some(128));
        assert_eq!(light.color_mode(), ColorMode::Brightness);
    }

    #[tokio::test]
    async fn actuator_without_brightness_turns_on() {
        let api = MockApi::new();
        api.set_device_states("50", [snapshot(json!({ "On": true }))]);
        let device = MockDevice::new("50", DeviceKind::Actuator).shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let light = LightEntity::actuator(manager, device.clone());

        light.turn_on(LightTurnOn::new()).await.unwrap();

        assert_eq!(device.commands(), vec![DeviceCommand::TurnOn]);
        assert_eq!(light.is_on(), Some(true));
    }

    #[tokio::test]
    async fn color_light_powers_on_before_applying_settings() {
        let api = MockApi::new();
        api.set_device_states("60", [snapshot(json!({ "On": true }))]);
        let device = MockDevice::new("60", DeviceKind::Light)
            .with_capabilities(Capabilities::builder().with_rgb().with_color_temp().build())
            .with_attributes(DeviceAttributes {
                is_on: Some(false),
                ..DeviceAttributes::default()
            })
            .shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let light = LightEntity::color(manager, device.clone());

        light
            .turn_on(LightTurnOn::new().with_rgb(255, 0, 0).with_color_temp(250))
            .await
            .unwrap();

        assert_eq!(
            device.commands(),
            vec![
                DeviceCommand::TurnOn,
                DeviceCommand::SetRgb(255, 0, 0),
                DeviceCommand::SetColorTemp(250),
            ]
        );
        assert_eq!(
            light.supported_color_modes(),
            &[ColorMode::Rgb, ColorMode::ColorTemp]
        );
        assert_eq!(light.color_mode(), ColorMode::Unknown);
    }

    #[tokio::test]
    async fn color_mode_follows_reported_mode() {
        let api = MockApi::new();
        let device = MockDevice::new("60", DeviceKind::Light)
            .with_capabilities(
                Capabilities::builder()
                    .with_rgb()
                    .with_color_temp()
                    .with_color_mode()
                    .build(),
            )
            .with_attributes(DeviceAttributes {
                color_mode_value: Some("ct".into()),
                color_temp_value: Some(250),
                ..DeviceAttributes::default()
            })
            .shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let light = LightEntity::color(manager, device);

        assert_eq!(light.color_mode(), ColorMode::ColorTemp);
        assert_eq!(light.color_temp_kelvin(), Some(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn turn_off_waits_for_confirmation() {
        let api = MockApi::new();
        api.set_device_states("60", [snapshot(json!({ "On": true }))]);
        let device = MockDevice::new("60", DeviceKind::Light).shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        manager.refresh_one(&DeviceId::new("60")).await.unwrap();
        let mut events = manager.subscribe();
        let light = LightEntity::color(Arc::clone(&manager), device.clone());

        api.set_device_states("60", [snapshot(json!({ "On": false }))]);
        light.turn_off().await.unwrap();

        assert_eq!(device.commands(), vec![DeviceCommand::TurnOff]);
        assert_eq!(light.is_on(), Some(false));
        assert_eq!(
            drain(&mut events),
            vec![StateEvent::device_changed(DeviceId::new("60"))]
        );
    }
}

// ============================================================================
// Thermostats
// ============================================================================

mod climate {
    use super::*;

    fn thermostat(capabilities: Capabilities) -> Arc<MockDevice> {
        MockDevice::new("30", DeviceKind::Thermostat)
            .with_descriptor(
                DeviceDescriptor::new("uid30", "Bathroom", "Thermostat")
                    .with_target_temperature_range(5.0, 30.0, 0.5),
            )
            .with_capabilities(capabilities)
            .with_attributes(DeviceAttributes {
                temperature_value: Some(19.5),
                auto_mode_value: Some(true),
                ..DeviceAttributes::default()
            })
            .shared()
    }

    #[tokio::test]
    async fn modes_and_bounds() {
        let api = MockApi::new();
        let device = thermostat(
            Capabilities::builder()
                .with_temperature()
                .with_auto_mode()
                .build(),
        );
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let climate = ClimateEntity::new(manager, device);

        assert_eq!(climate.hvac_modes(), &[HvacMode::Auto, HvacMode::HeatCool]);
        assert_eq!(climate.hvac_mode(), HvacMode::Auto);
        assert_eq!(climate.current_temperature(), Some(19.5));
        assert_eq!(climate.target_temperature(), None);
        assert!((climate.min_temp() - 5.0).abs() < f64::EPSILON);
        assert!((climate.max_temp() - 30.0).abs() < f64::EPSILON);
        assert!(!climate.supports_target_temperature());
    }

    #[tokio::test]
    async fn read_only_target_temperature_is_rejected() {
        let api = MockApi::new();
        let device = thermostat(Capabilities::builder().with_target_temperature().build());
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let climate = ClimateEntity::new(manager, device.clone());

        let err = climate.set_temperature(21.0).await.unwrap_err();

        assert!(matches!(err, Error::CapabilityNotSupported(_)));
        assert!(device.commands().is_empty());
        assert_eq!(climate.hvac_modes(), &[HvacMode::HeatCool]);
        assert_eq!(climate.hvac_mode(), HvacMode::HeatCool);
    }

    #[tokio::test]
    async fn set_temperature_requests_a_refresh() {
        let api = MockApi::new();
        let device = thermostat(
            Capabilities::builder()
                .with_settable_target_temperature()
                .build(),
        );
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let climate = ClimateEntity::new(manager, device.clone());

        climate.set_temperature(21.5).await.unwrap();

        assert_eq!(
            device.commands(),
            vec![DeviceCommand::SetTargetTemperature(21.5)]
        );
        assert_eq!(api.fleet_calls(), 1);
    }
}

// ============================================================================
// Sensors, buttons and updates
// ============================================================================

mod readings {
    use super::*;

    #[tokio::test]
    async fn contact_sensor_reports_state_and_icon() {
        let api = MockApi::new();
        let device = MockDevice::new("20", DeviceKind::Sensor)
            .with_attributes(DeviceAttributes {
                contact_state_value: Some(ContactState::Tilted),
                ..DeviceAttributes::default()
            })
            .shared();
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());

        let sensor = SensorEntity::new(manager, device, SensorKind::ContactState);

        assert_eq!(sensor.base().unique_id(), "uid20_fcontact_state");
        assert_eq!(sensor.base().name(), "Device 20 Contact State");
        assert_eq!(sensor.native_value(), Some(SensorValue::Text("Tilted")));
        assert_eq!(sensor.icon(), Some("mdi:network-strength-outline"));
        assert_eq!(
            sensor.options(),
            Some(&["Open", "Tilted", "Closed"][..])
        );
    }

    #[tokio::test]
    async fn ping_button_is_always_available() {
        let api = MockApi::new();
        let device = MockDevice::new("10", DeviceKind::Cover).shared();
        device.set_available(false);
        let manager = manager_with(&api, &[device.clone()], ManagerConfig::default());
        let button = PingButton::new(manager, device.clone());

        assert!(button.available());
        assert!(!button.enabled_by_default());
        assert_eq!(
            button.base().entity_category(),
            Some(EntityCategory::Diagnostic)
        );

        button.press().await.unwrap();
        assert_eq!(device.commands(), vec![DeviceCommand::Ping]);
        assert_eq!(api.fleet_calls(), 1);
    }

    #[tokio::test]
    async fn firmware_update_reads_hub_attributes() {
        let api = MockApi::new();
        let hub = MockDevice::hub()
            .with_attributes(DeviceAttributes {
                fw_version: Some("5.4.9".into()),
                fw_update_version: Some("5.5.0".into()),
                sw_platform: Some("HomePilot".into()),
                download_progress: Some(false),
                ..DeviceAttributes::default()
            })
            .shared();
        let manager = manager_with(&api, &[hub.clone()], ManagerConfig::default());
        let update = FirmwareUpdate::new(manager, hub.clone());

        assert_eq!(update.installed_version().as_deref(), Some("5.4.9"));
        assert_eq!(update.latest_version().as_deref(), Some("5.5.0"));
        assert_eq!(update.title().as_deref(), Some("HomePilot"));
        assert!(!update.in_progress());

        update.install(None, false).await.unwrap();
        assert_eq!(hub.commands(), vec![DeviceCommand::UpdateFirmware]);
    }
}
