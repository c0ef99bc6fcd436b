use mapguess::prelude::*;

/// Pointer, keyboard and resize handling as seen from the host
#[cfg(test)]
mod interaction_tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::from_profile(&GameProfile::Classic, Point::new(800.0, 600.0)).unwrap()
    }

    fn down(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown {
            position: Point::new(x, y),
        }
    }

    fn drag_to(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerUp {
            position: Point::new(x, y),
        }
    }

    #[test]
    fn test_horizontal_drag_moves_center_west() {
        let mut session = session();
        let events =
            session.handle_events([down(400.0, 300.0), drag_to(500.0, 300.0), up(500.0, 300.0)]);

        let pixels_per_lng = 256.0 * 8.0 / 360.0;
        let center = session.viewport().center();
        assert!((center.lng + 100.0 / pixels_per_lng).abs() < 1e-9);
        assert!((center.lat - 20.0).abs() < 1e-9);

        assert_eq!(events[0], GameEvent::DragStarted);
        assert!(matches!(events[1], GameEvent::DragEnded { .. }));
        assert!(session.selected_position().is_none(), "a drag is not a click");
    }

    #[test]
    fn test_click_after_drag_uses_new_center() {
        let mut session = session();
        session.handle_events([
            down(400.0, 300.0),
            drag_to(300.0, 300.0),
            up(300.0, 300.0),
            down(400.0, 300.0),
            up(400.0, 300.0),
        ]);

        let selected = session.selected_position().unwrap();
        assert!(selected.approx_eq(&session.viewport().center(), 1e-9));
        assert!(selected.lng > 0.0);
    }

    #[test]
    fn test_small_jitter_still_selects() {
        let mut session = session();
        session.handle_events([down(400.0, 300.0), drag_to(402.0, 301.0), up(402.0, 301.0)]);
        assert!(session.selected_position().is_some());
        assert_eq!(session.viewport().center(), GeoPoint::new(20.0, 0.0));
    }

    #[test]
    fn test_leaving_map_cancels_drag() {
        let mut session = session();
        let events = session.handle_events([
            down(400.0, 300.0),
            drag_to(600.0, 450.0),
            InputEvent::PointerLeave,
        ]);

        assert_eq!(events.last(), Some(&GameEvent::DragCanceled));
        assert_eq!(session.viewport().center(), GeoPoint::new(20.0, 0.0));
        assert!(session.viewport().drag_offset().is_zero());
        assert!(!session.viewport().is_dragging());

        // The release that follows is neither a drag nor a click
        assert!(session.handle_event(up(600.0, 450.0)).is_empty());
    }

    #[test]
    fn test_resize_during_drag_is_deferred() {
        let mut session = session();
        session.handle_events([down(400.0, 300.0), drag_to(420.0, 300.0)]);
        let grid_before = session.viewport().tiles().clone();

        session.handle_event(InputEvent::Resize {
            size: Point::new(1600.0, 1200.0),
        });
        assert!(session.viewport().has_pending_refresh());
        assert_eq!(session.viewport().tiles(), &grid_before);

        session.handle_event(up(420.0, 300.0));
        let viewport = session.viewport();
        assert!(!viewport.has_pending_refresh());
        assert!(viewport
            .tiles()
            .covers(&viewport.center(), 1600.0, 1200.0, 1));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut session = session();
        for _ in 0..30 {
            session.handle_event(InputEvent::KeyPress { key: KeyCode::Plus });
        }
        assert_eq!(session.viewport().zoom(), 18);
        assert!(session
            .handle_event(InputEvent::Control(ControlAction::ZoomIn))
            .is_empty());

        for _ in 0..30 {
            session.handle_event(InputEvent::KeyPress {
                key: KeyCode::Minus,
            });
        }
        assert_eq!(session.viewport().zoom(), 2);
    }

    #[test]
    fn test_pan_and_back_returns_to_start() {
        let mut session = session();
        for direction in [
            PanDirection::Left,
            PanDirection::Right,
            PanDirection::Up,
            PanDirection::Down,
        ] {
            let start = session.viewport().center();
            session.handle_event(InputEvent::Control(ControlAction::Pan(direction)));
            assert!(!session.viewport().center().approx_eq(&start, 1e-9));
            session.handle_event(InputEvent::Control(ControlAction::Pan(direction.opposite())));
            assert!(session.viewport().center().approx_eq(&start, 1e-9));
        }
    }

    #[test]
    fn test_grid_covers_viewport_after_every_change() {
        let mut session = session();
        let steps = [
            InputEvent::Control(ControlAction::ZoomIn),
            InputEvent::Control(ControlAction::Pan(PanDirection::Up)),
            InputEvent::Resize {
                size: Point::new(333.0, 777.0),
            },
            down(100.0, 100.0),
            drag_to(250.0, 400.0),
            up(250.0, 400.0),
            InputEvent::Control(ControlAction::ZoomOut),
        ];

        for step in steps {
            session.handle_event(step);
            let viewport = session.viewport();
            if viewport.is_dragging() {
                continue;
            }
            let size = viewport.size();
            assert!(viewport.tiles().covers(&viewport.center(), size.x, size.y, 1));
        }
    }

    #[test]
    fn test_touch_drives_the_same_gestures() {
        let mut session = session();
        let touch = |event_type, x, y| InputEvent::Touch {
            event_type,
            touches: vec![TouchPoint {
                id: 7,
                position: Point::new(x, y),
            }],
        };
        session.handle_events([
            touch(TouchEventType::Start, 200.0, 200.0),
            touch(TouchEventType::End, 200.0, 200.0),
        ]);
        assert!(session.selected_position().is_some());
    }

    #[test]
    fn test_touch_drag_ends_without_remaining_touches() {
        let mut session = session();
        let finger = |event_type, x, y| InputEvent::Touch {
            event_type,
            touches: vec![TouchPoint {
                id: 3,
                position: Point::new(x, y),
            }],
        };
        let events = session.handle_events([
            finger(TouchEventType::Start, 400.0, 300.0),
            finger(TouchEventType::Move, 500.0, 300.0),
            InputEvent::Touch {
                event_type: TouchEventType::End,
                touches: Vec::new(),
            },
        ]);

        let kinds: Vec<_> = events.iter().map(GameEvent::kind).collect();
        assert_eq!(&kinds[..2], ["dragstart", "dragend"]);
        let pixels_per_lng = 256.0 * 8.0 / 360.0;
        assert!((session.viewport().center().lng + 100.0 / pixels_per_lng).abs() < 1e-9);

        // A tap lifted the same way selects where the finger was
        session.handle_events([
            finger(TouchEventType::Start, 400.0, 300.0),
            InputEvent::Touch {
                event_type: TouchEventType::End,
                touches: Vec::new(),
            },
        ]);
        let selected = session.selected_position().unwrap();
        assert!(selected.approx_eq(&session.viewport().center(), 1e-9));
    }

    #[test]
    fn test_touch_cancel_discards_drag() {
        let mut session = session();
        let finger = |event_type, x, y| InputEvent::Touch {
            event_type,
            touches: vec![TouchPoint {
                id: 3,
                position: Point::new(x, y),
            }],
        };
        let events = session.handle_events([
            finger(TouchEventType::Start, 400.0, 300.0),
            finger(TouchEventType::Move, 500.0, 300.0),
            InputEvent::Touch {
                event_type: TouchEventType::Cancel,
                touches: Vec::new(),
            },
        ]);
        assert_eq!(events.last(), Some(&GameEvent::DragCanceled));
        assert_eq!(session.viewport().center(), GeoPoint::new(20.0, 0.0));
    }

    #[test]
    fn test_press_during_drag_discards_lost_drag() {
        let mut session = session();
        let events = session.handle_events([
            down(400.0, 300.0),
            drag_to(500.0, 300.0),
            down(400.0, 300.0),
        ]);
        assert_eq!(events.last(), Some(&GameEvent::DragCanceled));
        assert!(session.viewport().drag_offset().is_zero());

        session.handle_event(drag_to(410.0, 300.0));
        assert_eq!(session.viewport().drag_offset(), Point::new(10.0, 0.0));
        session.handle_event(up(410.0, 300.0));

        let pixels_per_lng = 256.0 * 8.0 / 360.0;
        assert!((session.viewport().center().lng + 10.0 / pixels_per_lng).abs() < 1e-9);
    }

    #[test]
    fn test_moving_out_of_bounds_cancels_drag() {
        let mut session = session();
        let events = session.handle_events([
            down(400.0, 300.0),
            drag_to(700.0, 300.0),
            drag_to(900.0, 300.0),
        ]);
        assert_eq!(events.last(), Some(&GameEvent::DragCanceled));
        assert!(!session.viewport().is_dragging());
        assert_eq!(session.viewport().center(), GeoPoint::new(20.0, 0.0));
        assert!(session.handle_event(up(900.0, 300.0)).is_empty());

        // A press that wanders off the map is not a click either
        session.handle_events([down(790.0, 300.0), drag_to(-5.0, 300.0), up(400.0, 300.0)]);
        assert!(session.selected_position().is_none());
    }

    #[test]
    fn test_extreme_input_is_clamped() {
        let mut session = session();
        assert_eq!(session.zoom_by(i32::MAX), 18);
        assert_eq!(session.zoom_by(i32::MIN), 2);

        session.handle_event(InputEvent::Resize {
            size: Point::new(f64::INFINITY, f64::NAN),
        });
        let viewport = session.viewport();
        assert!(viewport.size().x.is_finite());
        assert_eq!(viewport.size().y, 0.0);
        assert!(!viewport.tiles().is_empty());
    }

    #[test]
    fn test_touch_ignored_when_disabled() {
        let mut options = GameOptions::default();
        options.interaction.touch = false;
        let mut session =
            GameSession::new(options, LocationSet::builtin(), Point::new(800.0, 600.0)).unwrap();
        let events = session.handle_event(InputEvent::Touch {
            event_type: TouchEventType::Start,
            touches: vec![TouchPoint {
                id: 1,
                position: Point::new(10.0, 10.0),
            }],
        });
        assert!(events.is_empty());
        assert!(session.handle_event(up(10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_markers_track_the_view() {
        let mut session = session();
        session.handle_events([down(500.0, 350.0), up(500.0, 350.0)]);

        let markers = session.markers();
        let marker = &markers[0];
        assert_eq!(marker.kind, MarkerKind::Selection);
        assert!((marker.screen.x - 500.0).abs() < 1e-6);
        assert!((marker.screen.y - 350.0).abs() < 1e-6);

        // Zoomed in far enough, the pin drops out of the view
        for _ in 0..6 {
            session.handle_event(InputEvent::Control(ControlAction::ZoomIn));
        }
        assert!(session.markers().is_empty());
    }

    #[test]
    fn test_tile_store_loads_visible_grid() {
        let session = session();
        let grid = session.viewport().tiles();
        let mut store = TileStore::new(
            |tile: TileIndex, _url: &str| -> mapguess::Result<Vec<u8>> {
                if tile.y == 0 {
                    Err(GameError::Tile("unavailable".to_string()))
                } else {
                    Ok(vec![tile.x as u8, tile.y as u8])
                }
            },
            64,
        );

        let images = store.load_grid(grid);
        assert_eq!(images.len(), grid.len());
        assert!(images
            .iter()
            .all(|(raw, image)| image.is_loaded() == (grid.get(raw).unwrap().fetch.y != 0)));
        assert!(store.failures() > 0);
        assert!(grid.iter().all(|tile| tile.url.starts_with("/api/map/3/")));
    }
}
