//! Integration tests for suspendable operations and the driver

mod common;
use std::cell::RefCell;
use std::rc::Rc;

use common::{error_name, eval, eval_throw, runtime, strict_runtime};
use jscore::runtime::{DriverStats, PropertyDescriptor, StepResult};
use jscore::{Completion, Driver, DriverConfig, Error, ErrorKind, Runtime, RuntimeConfig, Task, Value};
use pretty_assertions::assert_eq;

mod accessors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_data_reads_never_suspend() {
        let rt = runtime();
        let ctx = rt.context().clone();
        let obj = rt.new_object();
        obj.raw_set_property("plain", Value::Number(1.0));
        assert!(obj.get("plain", &ctx).is_ready());
        assert!(obj.get("missing", &ctx).is_ready());
        assert!(obj.set("plain", Value::Number(2.0), &ctx).is_ready());
    }

    #[test]
    fn test_getter_suspends_until_driven() {
        let mut rt = runtime();
        let ctx = rt.context().clone();
        let getter = rt
            .realm()
            .new_native_function("get", |this, _, _| Task::normal(Value::Boolean(this.is_object())));
        let obj = rt.new_object();
        obj.define_own_property("computed", PropertyDescriptor::accessor(Some(getter), None));

        let task = obj.get("computed", &ctx);
        assert!(!task.is_ready());
        assert_eq!(eval(&mut rt, task), Value::Boolean(true));
    }

    #[test]
    fn test_inherited_getter_binds_receiver() {
        let mut rt = runtime();
        let ctx = rt.context().clone();
        let getter = rt.realm().new_native_function("get", |this, _, ctx| match this {
            Value::Object(obj) => obj.get("id", ctx),
            _ => Task::undefined(),
        });
        let proto = rt.new_object();
        proto.define_own_property("ident", PropertyDescriptor::accessor(Some(getter), None));
        let child = jscore::ObjectRef::with_prototype(Some(proto));
        child.raw_set_property("id", Value::from("child"));

        assert_eq!(eval(&mut rt, child.get("ident", &ctx)), Value::from("child"));
    }

    #[test]
    fn test_setter_receives_value() {
        let mut rt = runtime();
        let ctx = rt.context().clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let setter = rt.realm().new_native_function("set", move |_, args, _| {
            log.borrow_mut().push(args.first().cloned().unwrap_or_default());
            Task::undefined()
        });
        let obj = rt.new_object();
        obj.define_own_property("sink", PropertyDescriptor::accessor(None, Some(setter)));

        assert_eq!(eval(&mut rt, obj.set("sink", Value::Number(9.0), &ctx)), Value::Boolean(true));
        assert_eq!(*seen.borrow(), vec![Value::Number(9.0)]);
        // the accessor stays; no data slot is created
        assert!(obj.get_own(&"sink".into()).unwrap().is_accessor());
        assert_eq!(eval(&mut rt, obj.get("sink", &ctx)), Value::Undefined);
    }

    #[test]
    fn test_setter_return_is_its_result() {
        let mut rt = runtime();
        let ctx = rt.context().clone();
        let setter = rt
            .realm()
            .new_native_function("set", |_, _, _| Task::Ready(Completion::Return(Value::Undefined)));
        let obj = rt.new_object();
        obj.define_own_property("sink", PropertyDescriptor::accessor(None, Some(setter)));

        let completion = rt.run(obj.set("sink", Value::Number(1.0), &ctx)).unwrap();
        assert!(matches!(completion, Completion::Normal(Value::Boolean(true))));
        assert_eq!(eval(&mut rt, obj.set("sink", Value::Number(2.0), &ctx)), Value::Boolean(true));
    }

    #[test]
    fn test_getter_only_write() {
        let getter_fn = |rt: &Runtime| rt.realm().new_native_function("get", |_, _, _| Task::normal(Value::Number(1.0)));

        let mut rt = runtime();
        let ctx = rt.context().clone();
        let obj = rt.new_object();
        obj.define_own_property("ro", PropertyDescriptor::accessor(Some(getter_fn(&rt)), None));
        assert_eq!(eval(&mut rt, obj.set("ro", Value::Number(2.0), &ctx)), Value::Boolean(false));

        let mut strict = strict_runtime();
        let sctx = strict.context().clone();
        let thrown = eval_throw(&mut strict, obj.set("ro", Value::Number(2.0), &sctx));
        assert_eq!(error_name(&thrown), "TypeError");
    }

    #[test]
    fn test_getter_mutations_are_visible() {
        let mut rt = runtime();
        let ctx = rt.context().clone();
        let getter = rt.realm().new_native_function("get", |this, _, _| {
            if let Value::Object(obj) = this {
                obj.raw_set_property("touched", Value::Boolean(true));
            }
            Task::normal(Value::from("read"))
        });
        let obj = rt.new_object();
        obj.define_own_property("lazy", PropertyDescriptor::accessor(Some(getter), None));

        assert_eq!(eval(&mut rt, obj.get("lazy", &ctx)), Value::from("read"));
        assert_eq!(eval(&mut rt, obj.get("touched", &ctx)), Value::Boolean(true));
    }

    #[test]
    fn test_throw_unwinds_without_rollback() {
        let mut rt = runtime();
        let ctx = rt.context().clone();
        let getter = rt.realm().new_native_function("get", |this, _, ctx| {
            if let Value::Object(obj) = this {
                obj.raw_set_property("committed", Value::Number(1.0));
            }
            ctx.throw_type_error("getter failed")
        });
        let obj = rt.new_object();
        obj.define_own_property("boom", PropertyDescriptor::accessor(Some(getter), None));

        let task = obj
            .get("boom", &ctx)
            .map(|_| panic!("continuation after a throw must not run"));
        let thrown = eval_throw(&mut rt, task);
        assert_eq!(error_name(&thrown), "TypeError");
        assert_eq!(eval(&mut rt, obj.get("committed", &ctx)), Value::Number(1.0));
    }
}

mod stepping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_host_regains_control_at_each_call() {
        let rt = runtime();
        let ctx = rt.context().clone();
        let (value_of, calls) = common::constant_fn(&rt, "valueOf", Value::Number(2.0));
        let obj = rt.new_object();
        obj.raw_set_property("valueOf", Value::Object(value_of));

        let mut driver = Driver::new();
        driver.start(obj.to_number_value(&ctx)).unwrap();

        // the call has not happened until the driver performs it
        assert_eq!(*calls.borrow(), 0);
        assert!(matches!(driver.step(), StepResult::Continue));
        assert_eq!(*calls.borrow(), 1);

        let completion = loop {
            match driver.step() {
                StepResult::Continue => {}
                StepResult::Complete(c) => break c,
                StepResult::Idle => panic!("driver idle before completion"),
            }
        };
        assert!(matches!(completion, Completion::Normal(Value::Number(n)) if n == 2.0));
        assert!(matches!(driver.step(), StepResult::Idle));
    }

    #[test]
    fn test_abort_drops_pending_work() {
        let rt = runtime();
        let ctx = rt.context().clone();
        let (value_of, calls) = common::constant_fn(&rt, "valueOf", Value::Number(2.0));
        let obj = rt.new_object();
        obj.raw_set_property("valueOf", Value::Object(value_of));

        let mut driver = Driver::new();
        driver.start(obj.to_number_value(&ctx)).unwrap();
        driver.abort();
        assert!(driver.is_idle());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_deep_getter_chain_does_not_grow_host_stack() {
        let mut rt = runtime();
        let ctx = rt.context().clone();
        // each object's `next` getter reads `next` on its successor
        let getter = rt.realm().new_native_function("get next", |this, _, ctx| match this {
            Value::Object(obj) => match obj.get_own(&"successor".into()).and_then(|d| d.value().cloned()) {
                Some(Value::Object(successor)) => successor.get("next", ctx),
                _ => Task::normal(Value::from("end")),
            },
            _ => Task::undefined(),
        });
        let proto = rt.new_object();
        proto.define_own_property("next", PropertyDescriptor::accessor(Some(getter), None));

        let mut head = jscore::ObjectRef::with_prototype(Some(proto.clone()));
        for _ in 0..500 {
            let node = jscore::ObjectRef::with_prototype(Some(proto.clone()));
            node.raw_set_property("successor", Value::Object(head));
            head = node;
        }

        assert_eq!(eval(&mut rt, head.get("next", &ctx)), Value::from("end"));
        let DriverStats { calls, max_depth_seen, .. } = rt.stats();
        assert_eq!(calls, 501);
        assert_eq!(max_depth_seen, 501);
    }

    #[test]
    fn test_runaway_getter_hits_depth_limit() {
        let config = RuntimeConfig::default().with_driver(DriverConfig::default().with_max_call_depth(64));
        let mut rt = Runtime::with_config(config);
        let ctx = rt.context().clone();
        let getter = rt.realm().new_native_function("get", |this, _, ctx| match this {
            Value::Object(obj) => obj.get("forever", ctx),
            _ => Task::undefined(),
        });
        let obj = rt.new_object();
        obj.define_own_property("forever", PropertyDescriptor::accessor(Some(getter), None));

        match rt.eval(obj.get("forever", &ctx)) {
            Err(Error::Uncaught { kind, message }) => {
                assert_eq!(kind, ErrorKind::RangeError);
                assert_eq!(message, "Maximum call stack size exceeded");
            }
            other => panic!("unexpected {:?}", other),
        }
        // the runtime is usable afterwards
        assert_eq!(rt.eval(Task::normal(Value::Null)).unwrap(), Value::Null);
    }

    #[test]
    fn test_step_budget() {
        let config = RuntimeConfig::from_json(r#"{"driver": {"max_steps": 20}}"#).unwrap();
        let mut rt = Runtime::with_config(config);
        let ctx = rt.context().clone();
        let getter = rt.realm().new_native_function("get", |this, _, ctx| match this {
            Value::Object(obj) => obj.get("loop", ctx),
            _ => Task::undefined(),
        });
        let obj = rt.new_object();
        obj.define_own_property("loop", PropertyDescriptor::accessor(Some(getter), None));

        let err = rt.run(obj.get("loop", &ctx)).unwrap_err();
        assert!(matches!(err, Error::ResourceLimitError { .. }));
        assert!(err.to_string().contains("limit was 20"));
    }

    #[test]
    fn test_set_immediate_drives_setter() {
        let rt = runtime();
        let ctx = rt.context().clone();
        let store = rt.new_object();
        let target = store.clone();
        let setter = rt.realm().new_native_function("set", move |_, args, ctx| {
            target.set("stored", args.first().cloned().unwrap_or_default(), ctx)
        });
        let obj = rt.new_object();
        obj.define_own_property("proxy", PropertyDescriptor::accessor(None, Some(setter)));

        let completion = obj.set_immediate("proxy", Value::from("v"), &ctx).unwrap();
        assert!(matches!(completion, Completion::Normal(Value::Boolean(true))));
        assert_eq!(store.to_native().get("stored"), jscore::runtime::NativeValue::String("v".into()));
    }
}

mod completions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_eval_maps_escaping_completions() {
        let mut rt = runtime();
        let err = rt.eval(Task::Ready(Completion::Return(Value::Null))).unwrap_err();
        assert!(matches!(err, Error::AbruptCompletion(jscore::CompletionType::Return)));
        let err = rt.eval(Task::Ready(Completion::Continue(Some("outer".into())))).unwrap_err();
        assert!(matches!(err, Error::AbruptCompletion(jscore::CompletionType::Continue)));
    }

    #[test]
    fn test_any_value_is_throwable() {
        let mut rt = runtime();
        let thrown = eval_throw(&mut rt, Task::throw(Value::Number(42.0)));
        assert_eq!(thrown, Value::Number(42.0));
    }

    #[test]
    fn test_break_forwarded_through_getter_call() {
        let mut rt = runtime();
        let ctx = rt.context().clone();
        let getter = rt
            .realm()
            .new_native_function("get", |_, _, _| Task::Ready(Completion::Break(Some("label".into()))));
        let obj = rt.new_object();
        obj.define_own_property("b", PropertyDescriptor::accessor(Some(getter), None));
        match rt.run(obj.get("b", &ctx)).unwrap() {
            Completion::Break(Some(label)) => assert_eq!(label, "label"),
            other => panic!("unexpected {}", other),
        }
    }
}
